//! Environment-driven core configuration.
//!
//! Reads `ESSAYDESK_LOG_LEVEL`, `ESSAYDESK_LOG_DIR`, `ESSAYDESK_DB_PATH` and
//! `ESSAYDESK_PAGE_SIZE`. Unset variables fall back to defaults; set but
//! malformed ones are rejected.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::query::pagination::{PageRequest, DEFAULT_PAGE_SIZE, MAX_TAKE};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const LOG_LEVEL_ENV: &str = "ESSAYDESK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ESSAYDESK_LOG_DIR";
pub const DB_PATH_ENV: &str = "ESSAYDESK_DB_PATH";
pub const PAGE_SIZE_ENV: &str = "ESSAYDESK_PAGE_SIZE";

/// Variable lookup, so tests avoid mutating the process environment.
pub trait ConfigEnv {
    fn var(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigEnv for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F: Fn(&str) -> Option<String>> ConfigEnv for F {
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidLogDir(String),
    InvalidPageSize(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
            Self::InvalidLogDir(message) => write!(f, "{LOG_DIR_ENV}: {message}"),
            Self::InvalidPageSize(value) => write!(
                f,
                "{PAGE_SIZE_ENV}: expected an integer in 1..={MAX_TAKE}, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: &'static str,
    /// File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    /// In-memory database when unset.
    pub db_path: Option<PathBuf>,
    pub page_size: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            db_path: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&ProcessEnv)
    }

    pub fn from_env_with(env: &impl ConfigEnv) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(level) = non_blank(env.var(LOG_LEVEL_ENV)) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(dir) = non_blank(env.var(LOG_DIR_ENV)) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(ConfigError::InvalidLogDir)?);
        }
        config.db_path = non_blank(env.var(DB_PATH_ENV)).map(PathBuf::from);
        if let Some(raw) = non_blank(env.var(PAGE_SIZE_ENV)) {
            config.page_size = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_TAKE).contains(size))
                .ok_or(ConfigError::InvalidPageSize(raw))?;
        }

        Ok(config)
    }

    /// Page request using the configured default size.
    pub fn page_request(&self, take: Option<u32>, skip: Option<u32>) -> PageRequest {
        PageRequest::with_default_size(take, skip, self.page_size)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DB_PATH_ENV, LOG_LEVEL_ENV, PAGE_SIZE_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(CoreConfig::from_env_with(&env(&[])), Ok(CoreConfig::default()));
    }

    #[test]
    fn values_are_normalized() {
        let config = CoreConfig::from_env_with(&env(&[
            (LOG_LEVEL_ENV, "WARNING"),
            (DB_PATH_ENV, "/tmp/essaydesk.db"),
            (PAGE_SIZE_ENV, " 25 "),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/essaydesk.db")));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.page_request(None, None).take(), 25);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            CoreConfig::from_env_with(&env(&[(PAGE_SIZE_ENV, "0")])),
            Err(ConfigError::InvalidPageSize(_))
        ));
        assert!(matches!(
            CoreConfig::from_env_with(&env(&[(LOG_LEVEL_ENV, "loud")])),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
