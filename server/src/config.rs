//! Configuration management for the server.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// HMAC secret for signing and verifying access tokens
    pub jwt_secret: String,
    /// Lifetime of tokens issued at login
    pub jwt_ttl_seconds: i64,
    /// How many days of workout history a bootstrap returns
    pub bootstrap_window_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = get("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = get("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidMaxConnections)?,
            None => 10,
        };

        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        let jwt_ttl_seconds = match get("JWT_TTL_SECONDS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTokenTtl)?,
            None => 86_400,
        };

        let bootstrap_window_days = match get("BOOTSTRAP_WINDOW_DAYS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidBootstrapWindow)?,
            None => 30,
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            bootstrap_window_days,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,

    #[error("JWT_SECRET environment variable is required")]
    MissingJwtSecret,

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("DATABASE_MAX_CONNECTIONS must be a positive integer")]
    InvalidMaxConnections,

    #[error("JWT_TTL_SECONDS must be a positive integer")]
    InvalidTokenTtl,

    #[error("BOOTSTRAP_WINDOW_DAYS must be a positive integer")]
    InvalidBootstrapWindow,
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: "postgres://localhost/ptsync_test".into(),
        database_max_connections: 1,
        jwt_secret: "test-secret".into(),
        jwt_ttl_seconds: 600,
        bootstrap_window_days: 30,
    }
}
