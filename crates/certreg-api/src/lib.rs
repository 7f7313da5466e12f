//! # certreg-api — HTTP Service for the Certificate Registry
//!
//! ## API Surface
//!
//! | Prefix                   | Module                       | Purpose                         |
//! |--------------------------|------------------------------|---------------------------------|
//! | `/v1/owner`              | [`routes::institutions`]     | Registry owner                  |
//! | `/v1/institutions/*`     | [`routes::institutions`]     | Institution whitelist           |
//! | `/v1/issuers/*`          | [`routes::institutions`]     | Per-issuer history              |
//! | `/v1/certificates/*`     | [`routes::certificates`]     | Issue, read, verify, revoke     |
//! | `/v1/users/*`            | [`routes::users`]            | Per-recipient history           |
//! | `/v1/events/*`           | [`routes::events`]           | Event journal feed              |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! Handlers never decide access themselves: they forward the
//! `X-Caller-Address` identity to the registry, which enforces the owner
//! and institution rules.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

pub use config::AppConfig;
pub use error::AppError;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::institutions::router())
        .merge(routes::certificates::router())
        .merge(routes::users::router())
        .merge(routes::events::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — the registry is in memory, so ready once constructed.
async fn readiness() -> &'static str {
    "ready"
}
