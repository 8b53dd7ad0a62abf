//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database path, logging setup and counting policy.
//! - Layer sources: built-in defaults, then an optional JSON file, then
//!   `LAZYHABIT_*` environment variables. CLI flags are applied by callers.
//!
//! # Invariants
//! - Missing JSON fields take their defaults.
//! - Unknown counting policies and log levels are rejected, not ignored.

use crate::engine::aggregate::CountingPolicy;
use crate::logging::{default_log_level, LogLevel};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DB_PATH_ENV: &str = "LAZYHABIT_DB_PATH";
pub const LOG_DIR_ENV: &str = "LAZYHABIT_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "LAZYHABIT_LOG_LEVEL";
pub const COUNTING_POLICY_ENV: &str = "LAZYHABIT_COUNTING_POLICY";

const DEFAULT_DB_FILE_NAME: &str = "lazyhabit.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// Rolling log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
    pub log_level: LogLevel,
    pub counting_policy: CountingPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level(),
            counting_policy: CountingPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Reads a JSON config file; absent fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `LAZYHABIT_*` overrides read through `lookup`. Blank values are ignored.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(DB_PATH_ENV) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            self.log_level = level
                .parse()
                .map_err(|err: crate::logging::UnsupportedLogLevel| ConfigError::InvalidValue {
                    key: LOG_LEVEL_ENV,
                    message: err.to_string(),
                })?;
        }
        if let Some(policy) = read(COUNTING_POLICY_ENV) {
            self.counting_policy =
                policy
                    .parse()
                    .map_err(|err: crate::engine::aggregate::UnknownCountingPolicy| {
                        ConfigError::InvalidValue {
                            key: COUNTING_POLICY_ENV,
                            message: err.to_string(),
                        }
                    })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn json_fields_override_defaults_and_missing_fields_keep_them() {
        let config = CoreConfig::from_json(
            r#"{"db_path":"/data/habits.sqlite3","counting_policy":"scheduled_only"}"#,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/habits.sqlite3"));
        assert_eq!(config.counting_policy, CountingPolicy::ScheduledOnly);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn unknown_json_fields_are_rejected() {
        assert!(CoreConfig::from_json(r#"{"colour":"blue"}"#).is_err());
    }

    #[test]
    fn env_overrides_apply_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, "/tmp/env.sqlite3"),
            (LOG_DIR_ENV, "   "),
            (LOG_LEVEL_ENV, "WARNING"),
            (COUNTING_POLICY_ENV, "scheduled-only"),
        ]);
        let config = CoreConfig::default()
            .with_env_overrides(|key| env.get(key).map(|value| value.to_string()))
            .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.counting_policy, CountingPolicy::ScheduledOnly);
    }

    #[test]
    fn invalid_env_policy_is_reported_with_its_key() {
        let err = CoreConfig::default()
            .with_env_overrides(|key| (key == COUNTING_POLICY_ENV).then(|| "strict".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key, .. } if key == COUNTING_POLICY_ENV
        ));
    }
}
