//! HTTP adapters - REST API implementations.
//!
//! `router` assembles the auth endpoints with the cross-cutting layers:
//! request ids, tracing, CORS and a request timeout.

pub mod auth;
pub mod middleware;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

// Re-export key types for convenience
pub use auth::{auth_routes, handle_auth_error, AuthHandlers};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Builds the application router with all routes and layers.
pub fn router(handlers: AuthHandlers, server: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    auth_routes(handlers)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
