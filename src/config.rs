use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration read from the environment (and `.env` if present)
///
/// - `PORT` - Server port number (default: 8080)
/// - `DATABASE_URL` - Path to database file (default: "data.db")
/// - `JWT_SECRET` - HS256 secret for bearer tokens (required unless `APP_ENV=dev`)
/// - `JWT_EXPIRATION_HOURS` - Lifetime of issued tokens (default: 168)
/// - `CORS_ORIGIN` - Frontend origin allowed to call the API (default: "http://localhost:3000")
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cors_origin: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", "8080")?,
            database_url: try_load("DATABASE_URL", "data.db")?,
            jwt_secret: load_secret(
                env::var("JWT_SECRET").ok(),
                env::var("APP_ENV").is_ok_and(|app_env| app_env == "dev"),
            )?,
            jwt_expiration_hours: try_load("JWT_EXPIRATION_HOURS", "168")?,
            cors_origin: try_load("CORS_ORIGIN", "http://localhost:3000")?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value,
        reason: e.to_string(),
    })
}

/// Only a development environment may run on the built-in secret
fn load_secret(secret: Option<String>, dev_mode: bool) -> Result<String, ConfigError> {
    match secret {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ if dev_mode => {
            warn!("JWT_SECRET not set, APP_ENV=dev so using the development secret");
            Ok(DEV_JWT_SECRET.to_string())
        }
        _ => Err(ConfigError::Missing { key: "JWT_SECRET" }),
    }
}
