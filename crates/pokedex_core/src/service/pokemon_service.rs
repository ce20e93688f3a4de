//! Pokemon use-case service.
//!
//! # Responsibility
//! - Provide create/list/find/update/remove entry points for boundary code.
//! - Apply the configured default page size.
//! - Log unclassified storage failures and hide their details from callers.
//!
//! # Invariants
//! - Internal errors never carry storage error text outward.
//! - Conflict and not-found errors propagate with human-readable context.

use crate::model::pokemon::{
    NewPokemon, Pagination, Pokemon, PokemonId, PokemonPatch, PokemonValidationError,
};
use crate::repo::pokemon_repo::{DuplicateKey, PokemonRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-visible error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Internal,
}

/// What a not-found error was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundTarget {
    /// A lookup term (numeric `no`, identifier, or name).
    Term(String),
    /// A delete target, addressed by identifier only.
    Id(PokemonId),
}

/// Service error for Pokemon use-cases.
#[derive(Debug)]
pub enum PokemonServiceError {
    Validation(PokemonValidationError),
    Conflict(DuplicateKey),
    NotFound(NotFoundTarget),
    /// Details were logged; only the attempted action is kept.
    Internal { action: &'static str },
}

impl PokemonServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Classifies a repository error, logging anything that becomes internal.
    pub(crate) fn from_repo(action: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::Validation(inner) => Self::Validation(inner),
            RepoError::Conflict(key) => Self::Conflict(key),
            RepoError::TermNotFound(term) => Self::NotFound(NotFoundTarget::Term(term)),
            RepoError::IdNotFound(id) => Self::NotFound(NotFoundTarget::Id(id)),
            other => {
                error!(
                    "event=pokemon_{action} module=service status=error error_code=storage_failed error={other}"
                );
                Self::Internal { action }
            }
        }
    }
}

impl Display for PokemonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(key) => write!(f, "Pokemon exists in db {key}"),
            Self::NotFound(NotFoundTarget::Term(term)) => {
                write!(f, "Pokemon with id, name or no \"{term}\" not found")
            }
            Self::NotFound(NotFoundTarget::Id(id)) => {
                write!(f, "Pokemon with id \"{id}\" not found")
            }
            Self::Internal { action } => write!(f, "Can't {action} Pokemon - check server logs"),
        }
    }
}

impl Error for PokemonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, PokemonServiceError>;

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonPage {
    /// Records ordered by `no` ascending.
    pub items: Vec<Pokemon>,
    /// Limit actually applied (caller value or configured default).
    pub applied_limit: u32,
    pub offset: u32,
}

/// Pokemon service facade over repository implementations.
pub struct PokemonService<R: PokemonRepository> {
    repo: R,
    default_limit: u32,
}

impl<R: PokemonRepository> PokemonService<R> {
    /// Creates a service with the page size used when callers omit `limit`.
    pub fn new(repo: R, default_limit: u32) -> Self {
        Self {
            repo,
            default_limit,
        }
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub(crate) fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates one record; `name` is stored lower-case.
    pub fn create(&self, input: &NewPokemon) -> ServiceResult<Pokemon> {
        input.validate().map_err(PokemonServiceError::Validation)?;
        let created = self
            .repo
            .create_pokemon(input)
            .map_err(|err| PokemonServiceError::from_repo("create", err))?;
        info!(
            "event=pokemon_create module=service status=ok id={} no={}",
            created.id, created.no
        );
        Ok(created)
    }

    /// Lists one page ordered by `no`.
    ///
    /// No total count is returned.
    pub fn list(&self, page: &Pagination) -> ServiceResult<PokemonPage> {
        page.validate().map_err(PokemonServiceError::Validation)?;
        let applied_limit = page.limit.unwrap_or(self.default_limit);
        let applied = Pagination {
            limit: Some(applied_limit),
            offset: page.offset,
        };
        let items = self
            .repo
            .list_pokemon(&applied)
            .map_err(|err| PokemonServiceError::from_repo("list", err))?;

        Ok(PokemonPage {
            items,
            applied_limit,
            offset: applied.offset,
        })
    }

    /// Resolves `term` as numeric `no`, then identifier, then name.
    pub fn find_by_term(&self, term: &str) -> ServiceResult<Pokemon> {
        self.repo
            .find_by_term(term)
            .map_err(|err| PokemonServiceError::from_repo("find", err))
    }

    /// Applies a partial update to the record `term` resolves to.
    ///
    /// Returns the pre-update record overlaid with the patch rather than a
    /// fresh read.
    pub fn update(&self, term: &str, patch: &PokemonPatch) -> ServiceResult<Pokemon> {
        patch.validate().map_err(PokemonServiceError::Validation)?;
        let updated = self
            .repo
            .update_pokemon(term, patch)
            .map_err(|err| PokemonServiceError::from_repo("update", err))?;
        info!(
            "event=pokemon_update module=service status=ok id={} no={}",
            updated.id, updated.no
        );
        Ok(updated)
    }

    /// Deletes one record by store identifier.
    pub fn remove(&self, id: PokemonId) -> ServiceResult<()> {
        self.repo
            .delete_pokemon(id)
            .map_err(|err| PokemonServiceError::from_repo("delete", err))?;
        info!("event=pokemon_delete module=service status=ok id={id}");
        Ok(())
    }
}
