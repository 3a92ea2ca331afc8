//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database, logging and UCSC settings from `GENAXIS_*` variables.
//! - Provide defaults so binaries can start without any configuration.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Command-line flags override values resolved here; this module never reads argv.

use crate::logging::default_log_level;
use crate::ucsc::UCSC_BASE_URL;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "GENAXIS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "GENAXIS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GENAXIS_LOG_DIR";
pub const ENV_UCSC_BASE_URL: &str = "GENAXIS_UCSC_BASE_URL";
pub const ENV_UCSC_TIMEOUT_SECS: &str = "GENAXIS_UCSC_TIMEOUT_SECS";
pub const ENV_BIND: &str = "GENAXIS_BIND";

pub const DEFAULT_DB_FILE_NAME: &str = "genaxis.sqlite3";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Effective runtime settings shared by the CLI and the REST server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    /// Base URL of the UCSC Genome Browser REST API.
    pub ucsc_base_url: String,
    /// Request timeout for UCSC calls. `None` keeps the HTTP client default.
    pub ucsc_timeout: Option<Duration>,
    /// Listen address for the REST server.
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            ucsc_base_url: UCSC_BASE_URL.to_string(),
            ucsc_timeout: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    ///
    /// Unparsable timeouts are ignored and keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: get(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
            ucsc_base_url: get(ENV_UCSC_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.ucsc_base_url),
            ucsc_timeout: get(ENV_UCSC_TIMEOUT_SECS)
                .and_then(|secs| secs.parse::<u64>().ok())
                .map(Duration::from_secs),
            bind_addr: get(ENV_BIND).unwrap_or(defaults.bind_addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ucsc_base_url, "https://api.genome.ucsc.edu");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "   "),
            (ENV_LOG_DIR, ""),
        ]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn overrides_are_applied_and_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /tmp/genes.db "),
            (ENV_UCSC_BASE_URL, "http://localhost:9000/"),
            (ENV_UCSC_TIMEOUT_SECS, "15"),
            (ENV_BIND, "0.0.0.0:9999"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/genes.db"));
        assert_eq!(config.ucsc_base_url, "http://localhost:9000");
        assert_eq!(config.ucsc_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.bind_addr, "0.0.0.0:9999");
    }

    #[test]
    fn invalid_timeout_is_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_UCSC_TIMEOUT_SECS, "soon")]));
        assert_eq!(config.ucsc_timeout, None);
    }
}
