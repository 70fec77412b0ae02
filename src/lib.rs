//! # Formwell
//!
//! A minimal form-and-response web service. Clients create a form with a
//! prompt, fetch a form together with its collected responses, and submit new
//! responses to a form. Anonymous callers are handed a persistent identity in
//! a signed token stored in a cookie, so responses could later be attributed
//! without explicit accounts.
//!
//! ## Architecture
//!
//! ```text
//! HTTP Client → axum router → identity middleware → handlers
//!                                    ↓                  ↓
//!                             signed JWT cookie    SQLite (sqlx)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use formwell::{AppState, Config};
//! use formwell::identity::IdentityService;
//! use formwell::storage::SqliteStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let storage = SqliteStorage::new(&config.database).await?;
//!     let identity = IdentityService::new(&config.identity);
//!     let state = Arc::new(AppState::new(config, storage, identity));
//!     formwell::server::run(state).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management loaded from the process environment.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Signed-token identity issuance and verification.
pub mod identity;
/// HTTP server, routing and request handlers.
pub mod server;
/// SQLite storage layer for forms and responses.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
