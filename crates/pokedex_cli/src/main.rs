//! Pokedex CLI.
//!
//! Usage:
//!   pokedex create --no 1 --name Bulbasaur
//!   pokedex list [--limit 10] [--offset 20]
//!   pokedex get <term>                 - by number, id or name
//!   pokedex update <term> [--no N] [--name NAME]
//!   pokedex delete <id>
//!   pokedex seed <listing.json>        - PokeAPI listing payload
//!   pokedex request <METHOD> <PATH> [--body JSON]
//!
//! Every command goes through the same request boundary, prints the status
//! line to stderr and the JSON body to stdout, and exits non-zero on 4xx/5xx.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use pokedex_core::db::open_db;
use pokedex_core::{
    handle_request, init_logging, ApiResponse, AppConfig, LogTarget, PokemonService,
    SqlitePokemonRepository,
};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Pokedex - manage Pokemon records in a local store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides POKEDEX_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a Pokemon
    Create {
        /// Pokedex number (>= 1)
        #[arg(long)]
        no: i64,
        /// Name, stored lower-case
        #[arg(long)]
        name: String,
    },
    /// List Pokemon ordered by number
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Find one Pokemon by number, id or name
    Get { term: String },
    /// Update number and/or name of one Pokemon
    Update {
        term: String,
        #[arg(long)]
        no: Option<i64>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete one Pokemon by id
    Delete { id: String },
    /// Replace all records from a PokeAPI listing file
    Seed { file: PathBuf },
    /// Send a raw request to the boundary
    Request {
        method: String,
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
}

struct Request {
    method: &'static str,
    target: String,
    body: Option<String>,
}

impl Commands {
    fn into_request(self) -> Result<Request> {
        let request = match self {
            Self::Create { no, name } => Request {
                method: "POST",
                target: "/pokemon".to_string(),
                body: Some(json!({ "no": no, "name": name }).to_string()),
            },
            Self::List { limit, offset } => {
                let mut params = Vec::new();
                if let Some(limit) = limit {
                    params.push(format!("limit={limit}"));
                }
                if let Some(offset) = offset {
                    params.push(format!("offset={offset}"));
                }
                let target = if params.is_empty() {
                    "/pokemon".to_string()
                } else {
                    format!("/pokemon?{}", params.join("&"))
                };
                Request {
                    method: "GET",
                    target,
                    body: None,
                }
            }
            Self::Get { term } => Request {
                method: "GET",
                target: format!("/pokemon/{}", urlencoding::encode(&term)),
                body: None,
            },
            Self::Update { term, no, name } => {
                let mut patch = Map::new();
                if let Some(no) = no {
                    patch.insert("no".to_string(), json!(no));
                }
                if let Some(name) = name {
                    patch.insert("name".to_string(), json!(name));
                }
                Request {
                    method: "PATCH",
                    target: format!("/pokemon/{}", urlencoding::encode(&term)),
                    body: Some(Value::Object(patch).to_string()),
                }
            }
            Self::Delete { id } => Request {
                method: "DELETE",
                target: format!("/pokemon/{}", urlencoding::encode(&id)),
                body: None,
            },
            Self::Seed { file } => {
                let listing = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read seed file {}", file.display()))?;
                Request {
                    method: "POST",
                    target: "/seed".to_string(),
                    body: Some(listing),
                }
            }
            Self::Request { method, path, body } => Request {
                method: request_method(&method)?,
                target: path,
                body,
            },
        };
        Ok(request)
    }
}

// Raw requests only accept the verbs the boundary understands.
fn request_method(method: &str) -> Result<&'static str> {
    match method.trim().to_ascii_uppercase().as_str() {
        "GET" => Ok("GET"),
        "POST" => Ok("POST"),
        "PATCH" => Ok("PATCH"),
        "PUT" => Ok("PUT"),
        "DELETE" => Ok("DELETE"),
        other => anyhow::bail!("unsupported method `{other}`"),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("invalid configuration")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging(
        config.log_level,
        &LogTarget::from_dir(config.log_dir.as_deref()),
    )
    .map_err(anyhow::Error::msg)
    .context("failed to initialize logging")?;
    info!(
        "event=cli_start module=cli status=ok db_path={} default_limit={}",
        config.db_path.display(),
        config.default_limit
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let repo = SqlitePokemonRepository::try_new(&conn)?;
    let service = PokemonService::new(repo, config.default_limit);

    let request = cli.command.into_request()?;
    let response = handle_request(
        &service,
        request.method,
        &request.target,
        request.body.as_deref(),
    );
    print_response(&response, cli.compact)?;

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_response(response: &ApiResponse, compact: bool) -> Result<()> {
    eprintln!("status={}", response.status);
    if let Some(body) = &response.body {
        let rendered = if compact {
            serde_json::to_string(body)?
        } else {
            serde_json::to_string_pretty(body)?
        };
        println!("{rendered}");
    }
    Ok(())
}
