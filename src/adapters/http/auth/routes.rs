//! HTTP routes for auth endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::session_middleware;

use super::handlers::{
    auth_callback, change_portal, get_auth_url, get_session, handoff, list_portals, logout,
    refresh_tokens, AuthHandlers,
};

/// Creates the auth router with all endpoints.
///
/// Login and refresh are public. Every other route runs behind
/// `session_middleware`, which resolves the Bearer token into a session.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    let public = Router::new()
        .route("/auth/url", get(get_auth_url))
        .route("/auth/callback", post(auth_callback))
        .route("/auth/refresh", post(refresh_tokens));

    let session_scoped = Router::new()
        .route("/auth/session", get(get_session))
        .route("/auth/logout", post(logout))
        .route("/auth/portal", post(change_portal))
        .route("/auth/portals", get(list_portals))
        .route("/auth/handoff", post(handoff))
        .layer(middleware::from_fn_with_state(
            handlers.coordinator(),
            session_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(session_scoped)
        .with_state(handlers)
}
