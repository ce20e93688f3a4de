//! Pokemon repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/lookup/update/delete over the `pokemon` table.
//! - Translate unique-index violations into `RepoError::Conflict`.
//!
//! # Invariants
//! - Names are lower-cased before every write.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `delete_pokemon` only accepts store identifiers.

use crate::db::DbError;
use crate::model::pokemon::{
    NewPokemon, Pagination, Pokemon, PokemonId, PokemonPatch, PokemonValidationError,
};
use crate::repo::lookup::{resolve_term, LookupKey};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const POKEMON_SELECT_SQL: &str = "SELECT id, pokedex_no, name FROM pokemon";

static UNIQUE_COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UNIQUE constraint failed: pokemon\.(\w+)").expect("valid unique column regex")
});

pub type RepoResult<T> = Result<T, RepoError>;

/// Unique key that collided with an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKey {
    No(i64),
    Name(String),
}

impl Display for DuplicateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::No(no) => write!(f, "{}", serde_json::json!({ "no": no })),
            Self::Name(name) => write!(f, "{}", serde_json::json!({ "name": name })),
        }
    }
}

/// Repository error for Pokemon persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PokemonValidationError),
    Db(DbError),
    Conflict(DuplicateKey),
    TermNotFound(String),
    IdNotFound(PokemonId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict(key) => write!(f, "Pokemon exists in db {key}"),
            Self::TermNotFound(term) => {
                write!(f, "Pokemon with id, name or no \"{term}\" not found")
            }
            Self::IdNotFound(id) => write!(f, "Pokemon with id \"{id}\" not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted pokemon data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PokemonValidationError> for RepoError {
    fn from(value: PokemonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for Pokemon records.
pub trait PokemonRepository {
    /// Persists a new record and returns it with its generated identifier.
    fn create_pokemon(&self, input: &NewPokemon) -> RepoResult<Pokemon>;
    /// Lists records ordered by `no`. `limit = None` means unbounded.
    fn list_pokemon(&self, page: &Pagination) -> RepoResult<Vec<Pokemon>>;
    /// Runs one typed lookup query.
    fn find_by_key(&self, key: &LookupKey) -> RepoResult<Option<Pokemon>>;
    /// Applies the supplied patch fields to the record `term` resolves to and
    /// returns the pre-update record overlaid with the patch.
    fn update_pokemon(&self, term: &str, patch: &PokemonPatch) -> RepoResult<Pokemon>;
    /// Hard-deletes one record by store identifier.
    fn delete_pokemon(&self, id: PokemonId) -> RepoResult<()>;
    /// Replaces every stored record with `records` in one transaction.
    fn replace_all(&self, records: &[Pokemon]) -> RepoResult<usize>;

    /// Resolves a lookup term (numeric `no`, identifier, or name).
    fn find_by_term(&self, term: &str) -> RepoResult<Pokemon> {
        resolve_term(self, term)
    }
}

/// SQLite-backed Pokemon repository.
pub struct SqlitePokemonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePokemonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `RepoError::MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "pokemon")? {
            return Err(RepoError::MissingRequiredTable("pokemon"));
        }
        Ok(Self { conn })
    }

    fn query_one(&self, filter: &str, value: Value) -> RepoResult<Option<Pokemon>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POKEMON_SELECT_SQL} WHERE {filter} = ?1;"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pokemon_row(row)?));
        }
        Ok(None)
    }
}

impl PokemonRepository for SqlitePokemonRepository<'_> {
    fn create_pokemon(&self, input: &NewPokemon) -> RepoResult<Pokemon> {
        input.validate()?;
        let pokemon = Pokemon::new(input);
        insert_row(self.conn, &pokemon)?;
        Ok(pokemon)
    }

    fn list_pokemon(&self, page: &Pagination) -> RepoResult<Vec<Pokemon>> {
        page.validate()?;

        let mut sql = format!("{POKEMON_SELECT_SQL} ORDER BY pokedex_no ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        match page.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
            }
            None => sql.push_str(" LIMIT -1 OFFSET ?"),
        }
        bind_values.push(Value::Integer(i64::from(page.offset)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pokemon = Vec::new();
        while let Some(row) = rows.next()? {
            pokemon.push(parse_pokemon_row(row)?);
        }

        Ok(pokemon)
    }

    fn find_by_key(&self, key: &LookupKey) -> RepoResult<Option<Pokemon>> {
        match key {
            LookupKey::No(no) => self.query_one("pokedex_no", Value::Integer(*no)),
            LookupKey::Id(id) => self.query_one("id", Value::Text(id.to_string())),
            LookupKey::Name(name) => self.query_one("name", Value::Text(name.clone())),
        }
    }

    fn update_pokemon(&self, term: &str, patch: &PokemonPatch) -> RepoResult<Pokemon> {
        patch.validate()?;
        let patch = patch.normalized();
        let current = self.find_by_term(term)?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = current.merged(&patch);
        merged.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE pokemon
                 SET
                    pokedex_no = COALESCE(?1, pokedex_no),
                    name = COALESCE(?2, name)
                 WHERE id = ?3;",
                params![patch.no, patch.name.as_deref(), current.id.to_string()],
            )
            .map_err(|err| classify_write_error(err, patch.no, patch.name.as_deref()))?;

        if changed == 0 {
            return Err(RepoError::TermNotFound(term.to_string()));
        }

        Ok(merged)
    }

    fn delete_pokemon(&self, id: PokemonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM pokemon WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::IdNotFound(id));
        }

        Ok(())
    }

    fn replace_all(&self, records: &[Pokemon]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM pokemon;", [])?;
        for pokemon in records {
            insert_row(&tx, pokemon)?;
        }
        tx.commit()?;
        Ok(records.len())
    }
}

fn insert_row(conn: &Connection, pokemon: &Pokemon) -> RepoResult<()> {
    pokemon.validate()?;
    conn.execute(
        "INSERT INTO pokemon (id, pokedex_no, name) VALUES (?1, ?2, ?3);",
        params![pokemon.id.to_string(), pokemon.no, pokemon.name.as_str()],
    )
    .map_err(|err| classify_write_error(err, Some(pokemon.no), Some(&pokemon.name)))?;
    Ok(())
}

fn classify_write_error(err: rusqlite::Error, no: Option<i64>, name: Option<&str>) -> RepoError {
    if let Some(column) = unique_violation_column(&err) {
        match (column.as_str(), no, name) {
            ("pokedex_no", Some(no), _) => return RepoError::Conflict(DuplicateKey::No(no)),
            ("name", _, Some(name)) => {
                return RepoError::Conflict(DuplicateKey::Name(name.to_string()))
            }
            _ => {}
        }
    }
    RepoError::from(err)
}

fn unique_violation_column(err: &rusqlite::Error) -> Option<String> {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return None;
    };
    if failure.extended_code != rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
        return None;
    }
    UNIQUE_COLUMN_RE
        .captures(message)
        .and_then(|captures| captures.get(1))
        .map(|column| column.as_str().to_string())
}

fn parse_pokemon_row(row: &Row<'_>) -> RepoResult<Pokemon> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in pokemon.id"))
    })?;

    let pokemon = Pokemon {
        id,
        no: row.get("pokedex_no")?,
        name: row.get("name")?,
    };
    pokemon.validate().map_err(|err| {
        RepoError::InvalidData(format!("row `{id_text}` violates invariants: {err}"))
    })?;
    Ok(pokemon)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
