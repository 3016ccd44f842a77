//! Server configuration loaded from environment variables.

use std::env;

use thiserror::Error;

use common::{DatabaseConfig, JwtConfig, ServiceConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// Only used by debug builds when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters long")]
    WeakJwtSecret(usize),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Full server configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("service", &self.service)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.database.max_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_days", &self.jwt.expiration_days)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::MissingJwtSecret),
        };
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::WeakJwtSecret(MIN_JWT_SECRET_LENGTH));
        }

        let service_defaults = ServiceConfig::default();
        let database_defaults = DatabaseConfig::default();
        let jwt_defaults = JwtConfig::default();

        Ok(Self {
            service: ServiceConfig {
                service_name: service_defaults.service_name,
                host: lookup("SERVER_HOST").unwrap_or(service_defaults.host),
                port: parse(&lookup, "SERVER_PORT", service_defaults.port)?,
                cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                    .filter(|origin| !origin.trim().is_empty()),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(database_defaults.url),
                max_connections: parse(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    database_defaults.max_connections,
                )?,
                min_connections: parse(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    database_defaults.min_connections,
                )?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_days: parse(&lookup, "JWT_EXPIRATION_DAYS", jwt_defaults.expiration_days)?,
            },
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
