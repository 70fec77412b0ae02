use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Identity token settings.
    pub identity: IdentityConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to, e.g. `127.0.0.1:8000`.
    pub bind_addr: String,
    /// Domain attribute stamped on the identity cookie.
    pub cookie_domain: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file, auto-created on first start.
    pub path: PathBuf,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

/// Identity token configuration
#[derive(Clone)]
pub struct IdentityConfig {
    /// Symmetric key used to sign and verify identity tokens.
    pub signing_key: String,
}

// Manual Debug so the signing key never lands in logs.
impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level filter when `RUST_LOG` is unset.
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// Newline-delimited JSON output.
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `JWT_SIGNING_TOKEN` is a hard error; everything else has a
    /// default. A `.env` file in the working directory is loaded first if
    /// present.
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            cookie_domain: env::var("COOKIE_DOMAIN").unwrap_or_else(|_| "localhost".to_string()),
        };

        let database = DatabaseConfig {
            path: PathBuf::from(
                env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/forms.db".to_string()),
            ),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        let identity = IdentityConfig {
            signing_key: env::var("JWT_SIGNING_TOKEN").map_err(|_| AppError::Config {
                message: "JWT_SIGNING_TOKEN is required".to_string(),
            })?,
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            server,
            database,
            identity,
            logging,
        })
    }
}
