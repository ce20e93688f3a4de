//! Process configuration.
//!
//! # Responsibility
//! - Read settings once at startup from the environment (and `.env`).
//! - Reject malformed values before any store access happens.
//!
//! # Invariants
//! - `default_limit` is always `>= 1`.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_LIMIT_VAR: &str = "DEFAULT_LIMIT";
pub const DB_PATH_VAR: &str = "POKEDEX_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "POKEDEX_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "POKEDEX_LOG_DIR";

const FALLBACK_DEFAULT_LIMIT: u32 = 7;
const FALLBACK_DB_PATH: &str = "pokedex.sqlite3";

/// Startup settings, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Page size used by list queries that omit `limit`.
    pub default_limit: u32,
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Rolling log file directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_limit: FALLBACK_DEFAULT_LIMIT,
            db_path: PathBuf::from(FALLBACK_DB_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, value, reason } => {
                write!(f, "invalid {var}=`{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// Unset or blank variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = read(DEFAULT_LIMIT_VAR) {
            config.default_limit = parse_default_limit(&value)?;
        }
        if let Some(value) = read(DB_PATH_VAR) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(LOG_LEVEL_VAR) {
            config.log_level = normalize_level(&value).map_err(|reason| {
                ConfigError::InvalidValue {
                    var: LOG_LEVEL_VAR,
                    value: value.clone(),
                    reason,
                }
            })?;
        }
        if let Some(value) = read(LOG_DIR_VAR) {
            let dir = PathBuf::from(&value);
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    var: LOG_DIR_VAR,
                    value,
                    reason: "must be an absolute path".to_string(),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

fn parse_default_limit(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: DEFAULT_LIMIT_VAR,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match value.parse::<u32>() {
        Ok(0) => Err(invalid("must be at least 1")),
        Ok(limit) => Ok(limit),
        Err(_) => Err(invalid("must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DB_PATH_VAR, DEFAULT_LIMIT_VAR, LOG_DIR_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = config_from(&[]).expect("empty env should load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_limit, 7);
    }

    #[test]
    fn reads_limit_and_db_path() {
        let config = config_from(&[(DEFAULT_LIMIT_VAR, " 20 "), (DB_PATH_VAR, "/tmp/dex.db")])
            .expect("valid env should load");
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.db_path, PathBuf::from("/tmp/dex.db"));
    }

    #[test]
    fn rejects_zero_and_non_numeric_limits() {
        for value in ["0", "ten", "-4"] {
            let err = config_from(&[(DEFAULT_LIMIT_VAR, value)]).expect_err("limit must fail");
            assert!(err.to_string().contains(DEFAULT_LIMIT_VAR));
        }
    }

    #[test]
    fn rejects_relative_log_dir() {
        let err = config_from(&[(LOG_DIR_VAR, "logs")]).expect_err("relative dir must fail");
        assert!(err.to_string().contains("absolute"));
    }
}
