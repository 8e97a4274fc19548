// Process configuration, read once at startup and passed to the services that need it

use std::env;
use thiserror::Error;

/// Default token lifetime: 1000 hours
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3_600_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Token signing settings
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub product_key_secret: String,
}

impl AppConfig {
    /// Build the configuration from environment variables
    ///
    /// `DATABASE_URL`, `JSON_TOKEN_KEY` and `PRODUCT_KEY_SECRET` are required;
    /// everything else falls back to a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", 8080)?,
            jwt: JwtConfig {
                secret: required("JSON_TOKEN_KEY")?,
                ttl_seconds: parsed("TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?,
            },
            product_key_secret: required("PRODUCT_KEY_SECRET")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
