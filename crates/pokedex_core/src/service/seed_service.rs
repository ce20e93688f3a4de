//! Seed use-case: bulk load from a PokeAPI-style listing.
//!
//! # Invariants
//! - Seeding replaces the whole collection in one transaction.
//! - A failing entry leaves previously stored records untouched.

use crate::model::pokemon::{NewPokemon, Pokemon, PokemonValidationError};
use crate::repo::pokemon_repo::PokemonRepository;
use crate::service::pokemon_service::{PokemonService, PokemonServiceError, ServiceResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static POKEDEX_NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)/?$").expect("valid pokedex url regex"));

/// Listing payload as served by `GET https://pokeapi.co/api/v2/pokemon`.
///
/// Paging fields (`count`, `next`, `previous`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokeApiListing {
    pub results: Vec<PokeApiEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokeApiEntry {
    pub name: String,
    /// Resource URL, e.g. `https://pokeapi.co/api/v2/pokemon/25/`.
    pub url: String,
}

impl PokeApiEntry {
    /// Converts the entry into create input, taking `no` from the URL tail.
    pub fn to_new_pokemon(&self) -> Result<NewPokemon, PokemonValidationError> {
        let no = pokedex_no_from_url(&self.url).ok_or_else(|| {
            PokemonValidationError::MissingPokedexNo {
                url: self.url.clone(),
            }
        })?;
        let input = NewPokemon::new(no, self.name.as_str());
        input.validate()?;
        Ok(input)
    }
}

/// Extracts the trailing numeric path segment of a PokeAPI resource URL.
pub fn pokedex_no_from_url(url: &str) -> Option<i64> {
    POKEDEX_NO_RE
        .captures(url.trim())
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

impl<R: PokemonRepository> PokemonService<R> {
    /// Deletes every record and inserts the listing's entries.
    ///
    /// Returns the number of inserted records.
    pub fn seed(&self, listing: &PokeApiListing) -> ServiceResult<usize> {
        let records = listing
            .results
            .iter()
            .map(|entry| entry.to_new_pokemon().map(|input| Pokemon::new(&input)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(PokemonServiceError::Validation)?;

        let inserted = self
            .repo()
            .replace_all(&records)
            .map_err(|err| PokemonServiceError::from_repo("seed", err))?;
        info!("event=pokemon_seed module=service status=ok inserted={inserted}");
        Ok(inserted)
    }
}
