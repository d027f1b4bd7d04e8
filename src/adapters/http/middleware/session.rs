//! Session resolution middleware and extractors for axum.
//!
//! This module provides:
//! - `session_middleware` - Layer that resolves a Bearer access token into its
//!   session and injects it into extensions
//! - `OptionalSession` - Extractor handing the resolved session (if any) to a
//!   handler, which passes it explicitly into the coordinator
//!
//! ```text
//! Request → session_middleware → GetSession(token) → injects AuthenticatedSession
//!                                                          ↓
//!                                  Handler → OptionalSession extractor reads from extensions
//! ```
//!
//! A request without a Bearer token passes through untouched; the
//! coordinator reports the missing session itself.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::adapters::http::auth::handle_auth_error;
use crate::application::SessionLifecycleCoordinator;
use crate::domain::session::Session;

/// Session middleware state - wraps the coordinator.
pub type SessionState = Arc<SessionLifecycleCoordinator>;

/// A session resolved from the request's access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub session: Session,
    pub access_token: String,
}

/// Extracts the Bearer token from the `Authorization` header.
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn session_middleware(
    State(coordinator): State<SessionState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_string) else {
        return next.run(request).await;
    };

    match coordinator.get_session(&token).await {
        Ok(session) => {
            request.extensions_mut().insert(AuthenticatedSession {
                session,
                access_token: token,
            });
            next.run(request).await
        }
        Err(e) => handle_auth_error(e),
    }
}

/// Extractor for the session resolved by `session_middleware`.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<AuthenticatedSession>);

impl OptionalSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref().map(|s| &s.session)
    }

    pub fn access_token(&self) -> &str {
        self.0.as_ref().map(|s| s.access_token.as_str()).unwrap_or_default()
    }
}

impl<S> axum::extract::FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let session = parts.extensions.get::<AuthenticatedSession>().cloned();
            Ok(OptionalSession(session))
        })
    }
}
