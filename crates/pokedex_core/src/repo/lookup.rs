//! Term resolution for single-record lookups.
//!
//! A term is tried against each strategy in `LOOKUP_ORDER`. A strategy first
//! turns the term into a typed key (or declines), then the key is queried.
//! The first query that returns a row wins.
//!
//! Numeric terms are always tried as `no` first, so a Pokemon whose name is
//! itself numeric is only reachable through its identifier or when no record
//! carries that `no`.

use crate::model::pokemon::{normalize_name, Pokemon, PokemonId};
use crate::repo::pokemon_repo::{PokemonRepository, RepoError, RepoResult};
use log::debug;
use uuid::Uuid;

/// One way of interpreting a lookup term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Term parses as a number; match on `no`.
    PokedexNo,
    /// Term is a syntactically valid store identifier; match on `id`.
    StoreId,
    /// Match on `name`, trimmed and lower-cased.
    Name,
}

/// Fixed precedence in which strategies are tried.
pub const LOOKUP_ORDER: [LookupStrategy; 3] = [
    LookupStrategy::PokedexNo,
    LookupStrategy::StoreId,
    LookupStrategy::Name,
];

/// Typed query key produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    No(i64),
    Id(PokemonId),
    Name(String),
}

impl LookupStrategy {
    /// Returns the key this strategy would query for `term`, if it applies.
    pub fn key_for(self, term: &str) -> Option<LookupKey> {
        match self {
            Self::PokedexNo => numeric_term(term).and_then(integral_no).map(LookupKey::No),
            Self::StoreId => Uuid::parse_str(term).ok().map(LookupKey::Id),
            Self::Name => {
                let name = normalize_name(term.trim());
                if name.is_empty() {
                    None
                } else {
                    Some(LookupKey::Name(name))
                }
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::PokedexNo => "no",
            Self::StoreId => "id",
            Self::Name => "name",
        }
    }
}

/// Resolves `term` to exactly one record using `LOOKUP_ORDER`.
///
/// # Errors
/// - `RepoError::TermNotFound` when no strategy yields a row.
/// - Storage errors from the underlying queries, unchanged.
pub fn resolve_term<R>(repo: &R, term: &str) -> RepoResult<Pokemon>
where
    R: PokemonRepository + ?Sized,
{
    for strategy in LOOKUP_ORDER {
        let Some(key) = strategy.key_for(term) else {
            continue;
        };
        if let Some(pokemon) = repo.find_by_key(&key)? {
            debug!(
                "event=pokemon_lookup module=repo status=ok strategy={} id={}",
                strategy.as_str(),
                pokemon.id
            );
            return Ok(pokemon);
        }
    }

    Err(RepoError::TermNotFound(term.to_string()))
}

/// Parses a term as a finite number, ignoring surrounding whitespace.
pub fn numeric_term(term: &str) -> Option<f64> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

// Non-integral or out-of-range numbers can never equal a stored `no`.
fn integral_no(value: f64) -> Option<i64> {
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}
