//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`        - Health check: DB and cache (public)
//! - account routes       - Registration, login, verification (public, rate limited per IP)
//! - `/users/*`, `/contacts/*`, `/logout` - Bearer access token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on public account routes
//!   (configurable for proxy deployments)
//! - **Authentication** - JWT Bearer access token
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let public = if behind_proxy {
        api::routes::public_routes().layer(rate_limit::layer(SmartIpKeyExtractor))
    } else {
        api::routes::public_routes().layer(rate_limit::layer(PeerIpKeyExtractor))
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
