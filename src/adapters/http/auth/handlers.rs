//! HTTP handlers for auth endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::{ClientContext, OptionalSession};
use crate::application::{AuthCommand, RedirectSessionBridge, SessionLifecycleCoordinator};
use crate::domain::auth::AuthError;
use crate::domain::foundation::{ErrorCode, PortalId};
use crate::domain::session::HandoffPayload;

use super::dto::{
    AuthCallbackRequest, AuthResponse, AuthUrlQuery, AuthUrlResponse, ChangePortalRequest,
    ChangePortalResponse, ErrorResponse, HandoffRequest, HandoffResponse, LogoutRequest,
    PortalListResponse, RefreshTokensRequest, SessionResponse, TokensResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AuthHandlers {
    coordinator: Arc<SessionLifecycleCoordinator>,
    bridge: Arc<RedirectSessionBridge>,
}

impl AuthHandlers {
    pub fn new(
        coordinator: Arc<SessionLifecycleCoordinator>,
        bridge: Arc<RedirectSessionBridge>,
    ) -> Self {
        Self { coordinator, bridge }
    }

    pub fn coordinator(&self) -> Arc<SessionLifecycleCoordinator> {
        self.coordinator.clone()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /auth/url - Build the identity provider login URL
pub async fn get_auth_url(
    State(handlers): State<AuthHandlers>,
    Query(query): Query<AuthUrlQuery>,
) -> Response {
    match handlers.coordinator.get_auth_url(&query.callback_uri).await {
        Ok(url) => (StatusCode::OK, Json(AuthUrlResponse { url })).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /auth/callback - Complete the login
pub async fn auth_callback(
    State(handlers): State<AuthHandlers>,
    ClientContext(context): ClientContext,
    Json(req): Json<AuthCallbackRequest>,
) -> Response {
    let cmd = AuthCommand {
        code: req.code,
        state: req.state,
        callback_uri: req.callback_uri,
        context,
    };

    match handlers.coordinator.auth(cmd).await {
        Ok(result) => (StatusCode::OK, Json(AuthResponse::from(result))).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// GET /auth/session - Current session
pub async fn get_session(current: OptionalSession) -> Response {
    match current.0 {
        Some(current) => {
            (StatusCode::OK, Json(SessionResponse::from(current.session))).into_response()
        }
        None => handle_auth_error(AuthError::SessionContextMissing),
    }
}

/// POST /auth/refresh - Rotate the token pair
pub async fn refresh_tokens(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<RefreshTokensRequest>,
) -> Response {
    match handlers
        .coordinator
        .refresh_tokens_pair(&req.access_token, &req.refresh_token)
        .await
    {
        Ok(tokens) => (StatusCode::OK, Json(TokensResponse::from(tokens))).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /auth/logout - End the current session
pub async fn logout(
    State(handlers): State<AuthHandlers>,
    current: OptionalSession,
    Json(req): Json<LogoutRequest>,
) -> Response {
    match handlers
        .coordinator
        .logout(current.session(), current.access_token(), &req.refresh_token)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /auth/portal - Switch the active portal
pub async fn change_portal(
    State(handlers): State<AuthHandlers>,
    current: OptionalSession,
    Json(req): Json<ChangePortalRequest>,
) -> Response {
    match handlers
        .coordinator
        .change_portal(current.session(), PortalId::new(req.portal_id))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ChangePortalResponse::from(result))).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// GET /auth/portals - Portal memberships of the current user
pub async fn list_portals(
    State(handlers): State<AuthHandlers>,
    current: OptionalSession,
) -> Response {
    match handlers.coordinator.list_portals(current.session()).await {
        Ok(portals) => (StatusCode::OK, Json(PortalListResponse::from(portals))).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /auth/handoff - Hand the current session over to another portal
pub async fn handoff(
    State(handlers): State<AuthHandlers>,
    current: OptionalSession,
    ClientContext(context): ClientContext,
    Json(req): Json<HandoffRequest>,
) -> Response {
    let payload = current.session().map(|session| HandoffPayload {
        session_id: session.id.to_string(),
        email: session
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .unwrap_or_default(),
        snils: req.snils,
        origin_portal_url: req.origin_portal_url,
        target_url: req.target_url,
        user_agent: context
            .device
            .map(|d| d.user_agent)
            .unwrap_or_else(|| session.device.user_agent.clone()),
        ip: context.client_ip.unwrap_or_else(|| session.user_ip.clone()),
    });

    match handlers.bridge.handoff(payload).await {
        Ok(redirect_url) => (StatusCode::OK, Json(HandoffResponse { redirect_url })).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::InvalidDevice => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthenticated
        | ErrorCode::SessionNotFound
        | ErrorCode::SessionContextMissing
        | ErrorCode::ReauthRequired => StatusCode::UNAUTHORIZED,
        ErrorCode::PermissionDenied | ErrorCode::AccessDenied | ErrorCode::UnavailablePortal => {
            StatusCode::FORBIDDEN
        }
        ErrorCode::EmployeesNotFound | ErrorCode::PortalsNotFound | ErrorCode::NotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
        ErrorCode::EmptyPortalUrl | ErrorCode::UpstreamError => StatusCode::BAD_GATEWAY,
        ErrorCode::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn handle_auth_error(error: AuthError) -> Response {
    let status = status_for(error.code());
    (status, Json(ErrorResponse::from(&error))).into_response()
}
