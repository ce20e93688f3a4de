//! Core domain logic for the Pokedex backend.
//! This crate is the single source of truth for record invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{handle_request, ApiResponse};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::pokemon::{
    NewPokemon, Pagination, Pokemon, PokemonId, PokemonPatch, PokemonValidationError,
};
pub use repo::lookup::{LookupKey, LookupStrategy, LOOKUP_ORDER};
pub use repo::pokemon_repo::{
    DuplicateKey, PokemonRepository, RepoError, RepoResult, SqlitePokemonRepository,
};
pub use service::pokemon_service::{
    ErrorKind, NotFoundTarget, PokemonPage, PokemonService, PokemonServiceError, ServiceResult,
};
pub use service::seed_service::{PokeApiEntry, PokeApiListing};
