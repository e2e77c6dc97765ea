//! Process configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use gallery_catalog::inquiry::DEFAULT_WHATSAPP_NUMBER;
use gallery_catalog::IdStrategy;

/// Which store backs the catalog. Exactly one is active per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// PostgreSQL document table.
    Postgres { database_url: String },
    /// Single JSON file on local disk.
    File { path: PathBuf },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend: Backend,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub id_strategy: IdStrategy,
    /// Hex SHA-256 digest of the admin bearer token; `None` leaves mutations open.
    pub admin_token_sha256: Option<String>,
    pub whatsapp_number: String,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("GALLERY_BACKEND")
            .unwrap_or_else(|| "file".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => Backend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "file" => Backend::File {
                path: PathBuf::from(
                    lookup("GALLERY_DATA_FILE").unwrap_or_else(|| "artworks.json".to_string()),
                ),
            },
            other => {
                return Err(ConfigError::Invalid {
                    var: "GALLERY_BACKEND",
                    message: format!("'{}' (expected 'postgres' or 'file')", other),
                })
            }
        };

        let admin_token_sha256 = match lookup("GALLERY_ADMIN_TOKEN_SHA256") {
            Some(digest) => {
                let digest = digest.trim().to_ascii_lowercase();
                if digest.len() != 64 || hex::decode(&digest).is_err() {
                    return Err(ConfigError::Invalid {
                        var: "GALLERY_ADMIN_TOKEN_SHA256",
                        message: "expected 64 hex characters".to_string(),
                    });
                }
                Some(digest)
            }
            None => None,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", 5000)?,
            backend,
            max_connections: parse_or(&lookup, "GALLERY_MAX_CONNECTIONS", 10)?,
            connect_timeout: Duration::from_secs(parse_or(&lookup, "GALLERY_CONNECT_TIMEOUT_SECS", 5)?),
            request_timeout: Duration::from_secs(parse_or(&lookup, "GALLERY_REQUEST_TIMEOUT_SECS", 30)?),
            id_strategy: parse_or(&lookup, "GALLERY_ID_STRATEGY", IdStrategy::Timestamp)?,
            admin_token_sha256,
            whatsapp_number: lookup("GALLERY_WHATSAPP_NUMBER")
                .unwrap_or_else(|| DEFAULT_WHATSAPP_NUMBER.to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
