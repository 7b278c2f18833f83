//! Process configuration read from environment variables.

use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/ecoactivate";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BUCKET: &str = "ecoactivateapp-images";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection. `None` keeps the sqlx default.
    pub acquire_timeout: Option<Duration>,
    pub bind_addr: String,
    pub storage: StorageSettings,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub bucket: String,
    pub region: Option<String>,
    /// Custom S3-compatible endpoint (e.g. MinIO). Implies path-style addressing.
    pub endpoint: Option<String>,
    pub public_base_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_connections = parse_or(&get, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                var: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        let acquire_timeout = match get("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(v.parse().map_err(|_| ConfigError::InvalidValue {
                var: "DATABASE_ACQUIRE_TIMEOUT_SECS",
                value: v.clone(),
            })?)),
            None => None,
        };

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            max_connections,
            acquire_timeout,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            storage: StorageSettings {
                bucket: get("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.into()),
                region: get("S3_REGION"),
                endpoint: get("S3_ENDPOINT").map(|e| e.trim_end_matches('/').to_string()),
                public_base_url: get("S3_PUBLIC_BASE_URL"),
            },
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<G, T>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(var) {
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { var, value: v }),
        None => Ok(default),
    }
}
