//! HTTP server wiring.
//!
//! This module provides:
//! - Shared application state (config, storage, identity service)
//! - The axum router with the three form endpoints
//! - The identity middleware gating every route
//! - The listener loop with graceful shutdown

mod handlers;
mod middleware;

pub use handlers::{CreateFormRequest, CreatedForm, FormView, PostResponseRequest, ResponseView};
pub use middleware::{RequestIdentity, IDENTITY_COOKIE};

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::identity::IdentityService;
use crate::storage::SqliteStorage;

/// Application state shared across handlers.
///
/// Everything here is read-only after startup and injected explicitly;
/// nothing is ambient.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// SQLite storage backend.
    pub storage: SqliteStorage,
    /// Identity token service.
    pub identity: IdentityService,
}

/// Shared reference-counted application state.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(config: Config, storage: SqliteStorage, identity: IdentityService) -> Self {
        Self {
            config,
            storage,
            identity,
        }
    }
}

/// Build the application router.
///
/// Every route sits behind the identity middleware, so each request either
/// carries a verifiable identity cookie or gets one minted.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/v1/form", post(handlers::create_form))
        .route("/api/v1/form/{id}", get(handlers::get_form))
        .route("/api/v1/form/{id}/response", post(handlers::post_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::identity_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address and serve until shutdown.
pub async fn run(state: SharedState) -> AppResult<()> {
    let addr = state.config.server.bind_addr.clone();

    let listener = TcpListener::bind(&addr).await.map_err(|e| AppError::Server {
        message: format!("Failed to bind {}: {}", addr, e),
    })?;

    info!("Listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server {
            message: format!("Server error: {}", e),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
