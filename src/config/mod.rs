//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SHORTLIST_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::embedding::{EncoderConfig, RerankerConfig};
use crate::reputation::ReputationConfig;
use crate::reputation::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_MS};
use crate::vectordb::DEFAULT_COLLECTION_NAME;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SHORTLIST_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for ranking history. `None` disables the result store.
    pub results_path: Option<PathBuf>,

    /// Bi-encoder model directory. `None` selects the stub encoder.
    pub encoder_path: Option<PathBuf>,

    /// Cross-encoder model directory. `None` selects the stub reranker.
    pub reranker_path: Option<PathBuf>,

    /// Qdrant endpoint URL. `None` disables the indexed flow.
    pub qdrant_url: Option<String>,

    /// Qdrant collection for indexed resumes. Default: `resume_index`.
    pub collection: String,

    /// Default GitHub token for reputation lookups.
    pub github_token: Option<String>,

    /// Per-lookup reputation deadline in milliseconds. Default: `5000`.
    pub reputation_timeout_ms: u64,

    /// Candidates enriched concurrently. Default: `4`, at least `1`.
    pub reputation_concurrency: usize,
}

/// Default history directory used when `SHORTLIST_RESULTS_PATH` is not set.
pub const DEFAULT_RESULTS_PATH: &str = "./.data/results";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            results_path: Some(PathBuf::from(DEFAULT_RESULTS_PATH)),
            encoder_path: None,
            reranker_path: None,
            qdrant_url: None,
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            github_token: None,
            reputation_timeout_ms: DEFAULT_TIMEOUT_MS,
            reputation_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SHORTLIST_PORT";
    const ENV_BIND_ADDR: &'static str = "SHORTLIST_BIND_ADDR";
    const ENV_RESULTS_PATH: &'static str = "SHORTLIST_RESULTS_PATH";
    const ENV_ENCODER_PATH: &'static str = EncoderConfig::ENV_MODEL_PATH;
    const ENV_RERANKER_PATH: &'static str = RerankerConfig::ENV_MODEL_PATH;
    const ENV_QDRANT_URL: &'static str = "SHORTLIST_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "SHORTLIST_COLLECTION";
    const ENV_GITHUB_TOKEN: &'static str = "SHORTLIST_GITHUB_TOKEN";
    const ENV_REPUTATION_TIMEOUT_MS: &'static str = "SHORTLIST_REPUTATION_TIMEOUT_MS";
    const ENV_REPUTATION_CONCURRENCY: &'static str = "SHORTLIST_REPUTATION_CONCURRENCY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let results_path = match env::var(Self::ENV_RESULTS_PATH) {
            Ok(value) => Self::non_empty(value).map(PathBuf::from),
            Err(_) => defaults.results_path,
        };
        let encoder_path = Self::parse_optional_from_env(Self::ENV_ENCODER_PATH).map(PathBuf::from);
        let reranker_path =
            Self::parse_optional_from_env(Self::ENV_RERANKER_PATH).map(PathBuf::from);
        let qdrant_url = Self::parse_optional_from_env(Self::ENV_QDRANT_URL);
        let collection = Self::parse_optional_from_env(Self::ENV_COLLECTION)
            .unwrap_or(defaults.collection);
        let github_token = Self::parse_optional_from_env(Self::ENV_GITHUB_TOKEN);
        let reputation_timeout_ms = Self::parse_u64_from_env(
            Self::ENV_REPUTATION_TIMEOUT_MS,
            defaults.reputation_timeout_ms,
        );
        let reputation_concurrency = Self::parse_u64_from_env(
            Self::ENV_REPUTATION_CONCURRENCY,
            defaults.reputation_concurrency as u64,
        )
        .max(1) as usize;

        Ok(Self {
            port,
            bind_addr,
            results_path,
            encoder_path,
            reranker_path,
            qdrant_url,
            collection,
            github_token,
            reputation_timeout_ms,
            reputation_concurrency,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.results_path
            && path.exists()
            && !path.is_dir()
        {
            return Err(ConfigError::NotADirectory {
                name: Self::ENV_RESULTS_PATH,
                path: path.clone(),
            });
        }

        let model_dirs = [
            (Self::ENV_ENCODER_PATH, &self.encoder_path),
            (Self::ENV_RERANKER_PATH, &self.reranker_path),
        ];
        for (name, path) in model_dirs {
            let Some(path) = path else { continue };
            if !path.exists() {
                return Err(ConfigError::PathNotFound {
                    name,
                    path: path.clone(),
                });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory {
                    name,
                    path: path.clone(),
                });
            }
        }

        if self.collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_COLLECTION,
                reason: "collection name cannot be empty".to_string(),
            });
        }

        if self.reputation_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REPUTATION_TIMEOUT_MS,
                reason: "timeout must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Settings for the bi-encoder.
    pub fn encoder_config(&self) -> EncoderConfig {
        match self.encoder_path {
            Some(ref path) => EncoderConfig::new(path.clone()),
            None => EncoderConfig::stub(),
        }
    }

    /// Settings for the cross-encoder.
    pub fn reranker_config(&self) -> RerankerConfig {
        match self.reranker_path {
            Some(ref path) => RerankerConfig::new(path.clone()),
            None => RerankerConfig::stub(),
        }
    }

    /// Settings for reputation lookups.
    pub fn reputation_config(&self) -> ReputationConfig {
        let config = ReputationConfig::default()
            .with_timeout(Duration::from_millis(self.reputation_timeout_ms))
            .with_concurrency(self.reputation_concurrency);

        match self.github_token {
            Some(ref token) => config.with_github_token(token.clone()),
            None => config,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn non_empty(value: String) -> Option<String> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn parse_optional_from_env(var_name: &str) -> Option<String> {
        env::var(var_name).ok().and_then(Self::non_empty)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
