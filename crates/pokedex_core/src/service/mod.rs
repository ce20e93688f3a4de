//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Collapse repository errors into the validation/conflict/not-found/internal
//!   taxonomy seen by callers.

pub mod pokemon_service;
pub mod seed_service;
