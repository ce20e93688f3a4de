//! Pokemon domain model.
//!
//! # Responsibility
//! - Define the persisted record and its create/patch inputs.
//! - Validate caller input before it reaches persistence.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused.
//! - `no` is a positive integer.
//! - `name` is non-empty and stored lower-case.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store identifier for a Pokemon record.
///
/// Distinct from the domain `no`; assigned by the store at creation.
pub type PokemonId = Uuid;

/// Persisted Pokemon record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    /// Pokedex number, unique across records.
    pub no: i64,
    /// Lower-case name, unique across records.
    pub name: String,
}

impl Pokemon {
    /// Builds a new record with a freshly generated identifier.
    ///
    /// The input is normalized (`name` lower-cased) but not validated; write
    /// paths validate before persisting.
    pub fn new(input: &NewPokemon) -> Self {
        Self {
            id: Uuid::new_v4(),
            no: input.no,
            name: normalize_name(&input.name),
        }
    }

    /// Returns a copy of this record overlaid with the supplied patch fields.
    pub fn merged(&self, patch: &PokemonPatch) -> Self {
        Self {
            id: self.id,
            no: patch.no.unwrap_or(self.no),
            name: patch
                .name
                .as_deref()
                .map(normalize_name)
                .unwrap_or_else(|| self.name.clone()),
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), PokemonValidationError> {
        validate_no(self.no)?;
        validate_name(&self.name)?;
        if self.name != normalize_name(&self.name) {
            return Err(PokemonValidationError::NameNotNormalized(self.name.clone()));
        }
        Ok(())
    }
}

/// Create input with caller-supplied `no` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPokemon {
    pub no: i64,
    pub name: String,
}

impl NewPokemon {
    pub fn new(no: i64, name: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), PokemonValidationError> {
        validate_no(self.no)?;
        validate_name(&self.name)
    }
}

/// Partial update input. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PokemonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PokemonPatch {
    pub fn validate(&self) -> Result<(), PokemonValidationError> {
        if let Some(no) = self.no {
            validate_no(no)?;
        }
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        Ok(())
    }

    /// Returns the patch with `name` lower-cased, as it will be stored.
    pub fn normalized(&self) -> Self {
        Self {
            no: self.no,
            name: self.name.as_deref().map(normalize_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.no.is_none() && self.name.is_none()
    }
}

/// Paging window for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pagination {
    /// Maximum rows to return; the configured default applies when `None`.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of rows to skip, ordered by `no`.
    #[serde(default)]
    pub offset: u32,
}

impl Pagination {
    pub fn validate(&self) -> Result<(), PokemonValidationError> {
        match self.limit {
            Some(0) => Err(PokemonValidationError::ZeroLimit),
            _ => Ok(()),
        }
    }
}

/// Input validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokemonValidationError {
    /// `no` must be `>= 1`.
    NonPositiveNo(i64),
    /// `name` must contain at least one non-whitespace character.
    EmptyName,
    /// Persisted `name` is not lower-case.
    NameNotNormalized(String),
    /// `limit` must be `>= 1` when supplied.
    ZeroLimit,
    /// Seed entry URL does not end with a Pokedex number.
    MissingPokedexNo { url: String },
}

impl Display for PokemonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveNo(no) => write!(f, "no must be a positive integer, got {no}"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameNotNormalized(name) => write!(f, "name `{name}` is not lower-case"),
            Self::ZeroLimit => write!(f, "limit must be a positive integer"),
            Self::MissingPokedexNo { url } => {
                write!(f, "seed entry url `{url}` does not end with a pokedex number")
            }
        }
    }
}

impl Error for PokemonValidationError {}

/// Lower-cases a name the way it is stored.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

fn validate_no(no: i64) -> Result<(), PokemonValidationError> {
    if no < 1 {
        return Err(PokemonValidationError::NonPositiveNo(no));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), PokemonValidationError> {
    if name.trim().is_empty() {
        return Err(PokemonValidationError::EmptyName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewPokemon, Pagination, Pokemon, PokemonPatch, PokemonValidationError};

    #[test]
    fn new_record_lowercases_name() {
        let pokemon = Pokemon::new(&NewPokemon::new(1, "Bulbasaur"));
        assert_eq!(pokemon.name, "bulbasaur");
        assert_eq!(pokemon.no, 1);
        assert!(pokemon.validate().is_ok());
    }

    #[test]
    fn create_input_rejects_zero_and_blank() {
        assert_eq!(
            NewPokemon::new(0, "pikachu").validate(),
            Err(PokemonValidationError::NonPositiveNo(0))
        );
        assert_eq!(
            NewPokemon::new(25, "   ").validate(),
            Err(PokemonValidationError::EmptyName)
        );
    }

    #[test]
    fn merged_only_overrides_supplied_fields() {
        let base = Pokemon::new(&NewPokemon::new(150, "mew"));
        let patch = PokemonPatch {
            no: None,
            name: Some("Mewtwo".to_string()),
        };

        let merged = base.merged(&patch);
        assert_eq!(merged.id, base.id);
        assert_eq!(merged.no, 150);
        assert_eq!(merged.name, "mewtwo");
    }

    #[test]
    fn patch_validates_only_present_fields() {
        assert!(PokemonPatch::default().validate().is_ok());
        let bad = PokemonPatch {
            no: Some(-3),
            name: None,
        };
        assert_eq!(
            bad.validate(),
            Err(PokemonValidationError::NonPositiveNo(-3))
        );
    }

    #[test]
    fn pagination_rejects_zero_limit() {
        let page = Pagination {
            limit: Some(0),
            offset: 0,
        };
        assert_eq!(page.validate(), Err(PokemonValidationError::ZeroLimit));
        assert!(Pagination::default().validate().is_ok());
    }

    #[test]
    fn create_input_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<NewPokemon>(r#"{"no":1,"name":"a","level":5}"#);
        assert!(parsed.is_err());
    }
}
