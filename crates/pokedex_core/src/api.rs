//! HTTP-shaped request boundary.
//!
//! # Responsibility
//! - Route `(method, path?query, body)` requests to `PokemonService`.
//! - Reject malformed input before the service is invoked.
//! - Map service errors to status codes and JSON error bodies.
//!
//! # Invariants
//! - Handlers never panic; every outcome is an `ApiResponse`.
//! - 5xx bodies only carry the generic internal message.
//!
//! Routes:
//! - `POST /pokemon`, `GET /pokemon?limit=&offset=`
//! - `GET|PATCH /pokemon/:term`, `DELETE /pokemon/:id`
//! - `POST /seed`

use crate::model::pokemon::{NewPokemon, Pagination, PokemonId, PokemonPatch};
use crate::repo::pokemon_repo::PokemonRepository;
use crate::service::pokemon_service::{NotFoundTarget, PokemonService, PokemonServiceError};
use crate::service::seed_service::PokeApiListing;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Response produced by the request boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` for `204 No Content`.
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(err) => Self::error(500, format!("failed to encode response: {err}")),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({
                "statusCode": status,
                "message": message.into(),
                "error": reason_phrase(status),
            })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Dispatches one request.
///
/// `target` is the request path with an optional query string, e.g.
/// `/pokemon?limit=2&offset=1`. Path segments are percent-decoded.
pub fn handle_request<R: PokemonRepository>(
    service: &PokemonService<R>,
    method: &str,
    target: &str,
    body: Option<&str>,
) -> ApiResponse {
    let method = method.trim().to_ascii_uppercase();
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let response = match (method.as_str(), segments.as_slice()) {
        ("POST", ["pokemon"]) => create_pokemon(service, body),
        ("GET", ["pokemon"]) => list_pokemon(service, query),
        ("GET", ["pokemon", term]) => with_decoded(term, |term| find_pokemon(service, term)),
        ("PATCH", ["pokemon", term]) => {
            with_decoded(term, |term| update_pokemon(service, term, body))
        }
        ("DELETE", ["pokemon", id]) => with_decoded(id, |id| remove_pokemon(service, id)),
        ("POST", ["seed"]) => seed_pokemon(service, body),
        _ => ApiResponse::error(404, format!("Cannot {method} {path}")),
    };

    debug!(
        "event=api_request module=api method={method} path={path} status={}",
        response.status
    );
    response
}

/// `POST /pokemon`
pub fn create_pokemon<R: PokemonRepository>(
    service: &PokemonService<R>,
    body: Option<&str>,
) -> ApiResponse {
    let input: NewPokemon = match parse_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    if let Err(err) = input.validate() {
        return ApiResponse::error(400, err.to_string());
    }

    match service.create(&input) {
        Ok(created) => ApiResponse::json(201, created),
        Err(err) => service_error(&err),
    }
}

/// `GET /pokemon?limit=&offset=`
pub fn list_pokemon<R: PokemonRepository>(
    service: &PokemonService<R>,
    query: Option<&str>,
) -> ApiResponse {
    let page = match parse_pagination(query.unwrap_or_default()) {
        Ok(page) => page,
        Err(message) => return ApiResponse::error(400, message),
    };

    match service.list(&page) {
        Ok(page) => ApiResponse::json(200, page.items),
        Err(err) => service_error(&err),
    }
}

/// `GET /pokemon/:term`
pub fn find_pokemon<R: PokemonRepository>(service: &PokemonService<R>, term: &str) -> ApiResponse {
    match service.find_by_term(term) {
        Ok(pokemon) => ApiResponse::json(200, pokemon),
        Err(err) => service_error(&err),
    }
}

/// `PATCH /pokemon/:term`
pub fn update_pokemon<R: PokemonRepository>(
    service: &PokemonService<R>,
    term: &str,
    body: Option<&str>,
) -> ApiResponse {
    let patch: PokemonPatch = match parse_body(body) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    if let Err(err) = patch.validate() {
        return ApiResponse::error(400, err.to_string());
    }

    match service.update(term, &patch) {
        Ok(updated) => ApiResponse::json(200, updated),
        Err(err) => service_error(&err),
    }
}

/// `DELETE /pokemon/:id`
pub fn remove_pokemon<R: PokemonRepository>(service: &PokemonService<R>, id: &str) -> ApiResponse {
    let id: PokemonId = match Uuid::parse_str(id) {
        Ok(id) => id,
        Err(_) => return ApiResponse::error(400, format!("\"{id}\" is not a valid id")),
    };

    match service.remove(id) {
        Ok(()) => ApiResponse::no_content(),
        Err(err) => service_error(&err),
    }
}

/// `POST /seed`
pub fn seed_pokemon<R: PokemonRepository>(
    service: &PokemonService<R>,
    body: Option<&str>,
) -> ApiResponse {
    let listing: PokeApiListing = match parse_body(body) {
        Ok(listing) => listing,
        Err(response) => return response,
    };

    match service.seed(&listing) {
        Ok(inserted) => ApiResponse::json(
            201,
            json!({ "message": "Seed executed", "inserted": inserted }),
        ),
        Err(err) => service_error(&err),
    }
}

fn service_error(err: &PokemonServiceError) -> ApiResponse {
    let status = match err {
        PokemonServiceError::Validation(_) | PokemonServiceError::Conflict(_) => 400,
        // Delete targets answer 400 rather than 404.
        PokemonServiceError::NotFound(NotFoundTarget::Id(_)) => 400,
        PokemonServiceError::NotFound(NotFoundTarget::Term(_)) => 404,
        PokemonServiceError::Internal { .. } => 500,
    };
    ApiResponse::error(status, err.to_string())
}

fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, ApiResponse> {
    let raw = body
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ApiResponse::error(400, "request body is required"))?;
    serde_json::from_str(raw).map_err(|err| ApiResponse::error(400, err.to_string()))
}

fn parse_pagination(query: &str) -> Result<Pagination, String> {
    let mut page = Pagination::default();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_segment(value)?;
        match key {
            "limit" => match value.trim().parse::<u32>() {
                Ok(limit) if limit >= 1 => page.limit = Some(limit),
                _ => return Err("limit must be a positive integer".to_string()),
            },
            "offset" => {
                page.offset = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| "offset must be a non-negative integer".to_string())?;
            }
            other => return Err(format!("property {other} should not exist")),
        }
    }
    Ok(page)
}

fn with_decoded(raw: &str, handler: impl FnOnce(&str) -> ApiResponse) -> ApiResponse {
    match decode_segment(raw) {
        Ok(decoded) => handler(&decoded),
        Err(message) => ApiResponse::error(400, message),
    }
}

fn decode_segment(raw: &str) -> Result<String, String> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| format!("`{raw}` is not valid percent-encoded UTF-8"))
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    }
}
