//! HTTP route handlers.
//!
//! The status page and the health endpoint both carry live state and are
//! marked no-store; static assets get a long immutable cache.
//!
//! Request tracing is enabled via middleware that assigns a request ID
//! to each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::compression::CompressionLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_NO_STORE, CACHE_CONTROL_STATIC, HEALTH_PATH};
use crate::http::static_files::create_static_service;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Status page - live state, never cached
    let home_routes = Router::new()
        .route("/", get(home::index))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    // Health endpoint - sets its own no-store header
    let health_routes = Router::new().route(HEALTH_PATH, get(health::health));

    // Static files - long cache with immutable hint
    let static_files = create_static_service(&state.config.assets.static_dir);
    let static_routes = Router::new()
        .nest_service("/static", static_files)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ));

    Router::new()
        .merge(home_routes)
        .merge(health_routes)
        .merge(static_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
        // gzip when the client accepts it
        .layer(CompressionLayer::new())
}
