//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the Pokemon data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes validate records before any SQL mutation.
//! - Uniqueness is enforced by the store at write time and surfaced as
//!   `RepoError::Conflict`, never pre-checked with a read.

pub mod lookup;
pub mod pokemon_repo;
