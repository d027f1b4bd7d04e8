//! HTTP DTOs for auth endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::{AuthResult, ChangePortalResult};
use crate::domain::auth::AuthError;
use crate::domain::portal::Portal;
use crate::domain::session::{AuthType, Session, Token, TokensPair};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for building the login URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthUrlQuery {
    #[serde(default)]
    pub callback_uri: String,
}

/// Identity provider callback payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCallbackRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub callback_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokensRequest {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Logout request. The access token comes from the `Authorization` header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePortalRequest {
    pub portal_id: i64,
}

/// Cross-portal handoff request. Session, email, user agent and IP are taken
/// from the authenticated request.
#[derive(Debug, Clone, Deserialize)]
pub struct HandoffRequest {
    pub origin_portal_url: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub snils: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            value: token.value,
            expires_at: token.expires_at.map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokensResponse {
    pub access_token: TokenResponse,
    pub refresh_token: TokenResponse,
}

impl From<TokensPair> for TokensResponse {
    fn from(pair: TokensPair) -> Self {
        Self {
            access_token: pair.access_token.into(),
            refresh_token: pair.refresh_token.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalResponse {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub logo_image: String,
    pub is_selected: bool,
}

impl From<Portal> for PortalResponse {
    fn from(portal: Portal) -> Self {
        Self {
            id: portal.id.value(),
            name: portal.name,
            url: portal.url,
            logo_image: portal.logo_image,
            is_selected: portal.is_selected,
        }
    }
}

fn portals(portals: Vec<Portal>) -> Vec<PortalResponse> {
    portals.into_iter().map(Into::into).collect()
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub tokens: TokensResponse,
    pub portal_session_id: String,
    pub portals: Vec<PortalResponse>,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            tokens: result.tokens.into(),
            portal_session_id: result.portal_session_id,
            portals: portals(result.portals),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePortalResponse {
    pub portal_session_id: String,
    pub portals: Vec<PortalResponse>,
}

impl From<ChangePortalResult> for ChangePortalResponse {
    fn from(result: ChangePortalResult) -> Self {
        Self {
            portal_session_id: result.portal_session_id,
            portals: portals(result.portals),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalListResponse {
    pub portals: Vec<PortalResponse>,
}

impl From<Vec<Portal>> for PortalListResponse {
    fn from(list: Vec<Portal>) -> Self {
        Self {
            portals: portals(list),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionUserResponse {
    pub id: String,
    pub login: String,
    pub email: String,
    pub full_name: String,
}

/// Session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUserResponse>,
    pub auth_type: AuthType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_portal: Option<PortalResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_session_id: Option<String>,
    pub issuer: String,
    pub subject: String,
    pub access_expires_at: String,
    pub refresh_expires_at: String,
    pub created_at: String,
    pub is_active: bool,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let (active_portal, portal_session_id) = match session.active_portal {
            Some(active) => (Some(active.portal.into()), Some(active.portal_session_id)),
            None => (None, None),
        };

        Self {
            id: session.id.to_string(),
            user: session.user.map(|u| SessionUserResponse {
                id: u.id.to_string(),
                login: u.login,
                email: u.email,
                full_name: u.full_name,
            }),
            auth_type: session.auth_type,
            active_portal,
            portal_session_id,
            issuer: session.issuer,
            subject: session.subject,
            access_expires_at: session.access_expires_at.as_datetime().to_rfc3339(),
            refresh_expires_at: session.refresh_expires_at.as_datetime().to_rfc3339(),
            created_at: session.created_at.as_datetime().to_rfc3339(),
            is_active: session.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandoffResponse {
    pub redirect_url: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        let details = match error {
            AuthError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            AuthError::Structured {
                field,
                reauth_required,
                ..
            } => Some(serde_json::json!({
                "field": field,
                "reauth_required": reauth_required,
            })),
            AuthError::Upstream {
                operation,
                retryable,
                ..
            } => Some(serde_json::json!({
                "operation": operation,
                "retryable": retryable,
            })),
            AuthError::UnavailablePortal(id) | AuthError::EmptyPortalUrl(id) => {
                Some(serde_json::json!({ "portal_id": id.value() }))
            }
            _ => None,
        };

        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{ErrorClassifier, Operation, UpstreamError};
    use crate::domain::foundation::{PortalId, Timestamp};

    #[test]
    fn callback_request_tolerates_missing_fields() {
        let req: AuthCallbackRequest = serde_json::from_str(r#"{"code":"abc"}"#).unwrap();
        assert_eq!(req.code, "abc");
        assert!(req.state.is_empty());
        assert!(req.callback_uri.is_empty());
    }

    #[test]
    fn tokens_response_formats_expiry_as_rfc3339() {
        let expires = Timestamp::now();
        let response: TokensResponse = TokensPair::new(
            Token::new("at", Some(expires)),
            Token::new("rt", None),
        )
        .into();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"]["value"], "at");
        assert_eq!(
            json["access_token"]["expires_at"],
            expires.as_datetime().to_rfc3339()
        );
        assert!(json["refresh_token"].get("expires_at").is_none());
    }

    #[test]
    fn portal_response_carries_selection_flag() {
        let mut portal = Portal::new(4, "Four", "https://p4").with_logo("logo.png");
        portal.is_selected = true;

        let response: PortalResponse = portal.into();

        assert_eq!(response.id, 4);
        assert_eq!(response.logo_image, "logo.png");
        assert!(response.is_selected);
    }

    #[test]
    fn structured_error_exposes_reauth_flag() {
        let error = AuthError::Structured {
            field: "refresh_token".to_string(),
            message: "revoked".to_string(),
            reauth_required: true,
        };

        let response = ErrorResponse::from(&error);

        let details = response.details.unwrap();
        assert_eq!(details["field"], "refresh_token");
        assert_eq!(details["reauth_required"], true);
    }

    #[test]
    fn unavailable_portal_error_names_the_portal() {
        let response = ErrorResponse::from(&AuthError::UnavailablePortal(PortalId::new(9)));

        assert_eq!(response.code, "UNAVAILABLE_PORTAL");
        assert_eq!(response.details.unwrap()["portal_id"], 9);
    }

    #[test]
    fn upstream_failure_body_hides_collaborator_text() {
        let error = ErrorClassifier::resolve(
            Operation::CreateSession,
            UpstreamError::transient("dial tcp 10.2.3.4:9090: connection refused"),
        );

        let body = serde_json::to_string(&ErrorResponse::from(&error)).unwrap();

        assert!(!body.contains("10.2.3.4"), "{}", body);
        assert!(!body.contains("connection refused"), "{}", body);
        assert!(body.contains("UPSTREAM_UNAVAILABLE"), "{}", body);
    }

    #[test]
    fn precondition_body_hides_collaborator_text() {
        let error = ErrorClassifier::resolve(
            Operation::Logout,
            UpstreamError::Precondition("pg row lock held by pid 4411".to_string()),
        );

        let response = ErrorResponse::from(&error);

        assert_eq!(response.code, "PRECONDITION_FAILED");
        assert_eq!(response.message, "Precondition failed");
    }

    #[test]
    fn plain_errors_have_no_details() {
        let response = ErrorResponse::from(&AuthError::PortalsNotFound);
        assert_eq!(response.code, "PORTALS_NOT_FOUND");
        assert!(response.details.is_none());
    }
}
