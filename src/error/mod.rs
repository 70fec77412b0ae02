use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or incomplete startup configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What was missing or invalid.
        message: String,
    },

    /// The request body was not the expected JSON shape.
    #[error("Malformed payload")]
    MalformedPayload,

    /// The referenced form does not exist.
    #[error("Form not found: {form_id}")]
    FormNotFound {
        /// The id that missed.
        form_id: String,
    },

    /// The identity cookie carried an unusable token.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// A storage-layer fault.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A transport-level server fault (bind, accept loop).
    #[error("Server error: {message}")]
    Server {
        /// What failed.
        message: String,
    },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened or reached.
    #[error("Database connection failed: {message}")]
    Connection {
        /// Driver-level detail.
        message: String,
    },

    /// Applying embedded migrations failed.
    #[error("Migration failed: {message}")]
    Migration {
        /// Driver-level detail.
        message: String,
    },

    /// Any other query-time fault.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Identity token errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Bad signature, disallowed algorithm, or malformed token.
    #[error("Invalid identity token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// A verified token without the identity claim.
    #[error("Token is missing its identity claim")]
    MissingIdentity,
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

// Status-code mapping lives in one place. The upstream behavior only pins
// "200 on success"; the codes below are the conventional choices documented
// in DESIGN.md.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::FormNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Identity(_) => StatusCode::UNAUTHORIZED,
            AppError::Config { .. } | AppError::Storage(_) | AppError::Server { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
        }

        (status, self.to_string()).into_response()
    }
}
