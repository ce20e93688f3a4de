//! Domain model for Pokedex records.
//!
//! # Responsibility
//! - Define canonical data structures used by repository and service code.
//! - Own input validation and name normalization rules.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `PokemonId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod pokemon;
