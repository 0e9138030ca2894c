//! Server configuration from environment variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `VOLUNTEER_PORT` | `8080` | listen port |
//! | `VOLUNTEER_LOG_LEVEL` | `info` | tracing level |
//! | `AUTH0_DOMAIN` | | tenant domain for JWT verification |
//! | `API_AUDIENCE` | | expected `aud` claim, required with `AUTH0_DOMAIN` |
//! | `VOLUNTEER_DEV_TOKENS` | | JSON token table for the static verifier |
//! | `DATABASE_URL` | | PostgreSQL connection string (feature `postgres`) |
//! | `VOLUNTEER_SEED_FIXTURES` | `false` | load the fixture dataset into an empty store |

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("no identity verifier configured: set AUTH0_DOMAIN and API_AUDIENCE, or VOLUNTEER_DEV_TOKENS")]
    NoVerifier,

    #[error("failed to read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// How bearer credentials are verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierSource {
    /// Auth0-style JWTs checked against the tenant JWKS
    Auth0 { domain: String, audience: String },
    /// Static token table loaded from a JSON file
    DevTokens(PathBuf),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub log_level: Level,
    pub verifier: VerifierSource,
    pub database_url: Option<String>,
    pub seed_fixtures: bool,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// when it is set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("VOLUNTEER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "VOLUNTEER_PORT",
                value,
            })?,
            None => 8080,
        };

        let log_level = match var("VOLUNTEER_LOG_LEVEL") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "VOLUNTEER_LOG_LEVEL",
                value,
            })?,
            None => Level::INFO,
        };

        let verifier = match (var("AUTH0_DOMAIN"), var("API_AUDIENCE")) {
            (Some(domain), Some(audience)) => VerifierSource::Auth0 { domain, audience },
            (Some(_), None) => return Err(ConfigError::Missing("API_AUDIENCE")),
            (None, _) => match var("VOLUNTEER_DEV_TOKENS") {
                Some(path) => VerifierSource::DevTokens(PathBuf::from(path)),
                None => return Err(ConfigError::NoVerifier),
            },
        };

        let seed_fixtures = match var("VOLUNTEER_SEED_FIXTURES") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                name: "VOLUNTEER_SEED_FIXTURES",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            port,
            log_level,
            verifier,
            database_url: var("DATABASE_URL"),
            seed_fixtures,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
