//! Errors surfaced by the session lifecycle coordinator.
//!
//! These are the only failure values the transport layer ever sees. Each one
//! maps to a stable [`ErrorCode`], so HTTP handlers can choose a status code
//! and user-facing message without knowing anything about the collaborators
//! behind the coordinator.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, PortalId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Caller-supplied input is missing or malformed.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The person exists at the identity provider but has no employee record.
    #[error("Employees not found")]
    EmployeesNotFound,

    /// The identity resolved without a linked user.
    #[error("Permission denied")]
    PermissionDenied,

    /// The identity is not on the configured access allowlist.
    #[error("Access denied")]
    AccessDenied,

    #[error("Portals not found")]
    PortalsNotFound,

    /// No device was attached to the request, or it has no user agent.
    #[error("Invalid device")]
    InvalidDevice,

    /// The access token is well-formed but resolves to no session.
    #[error("Session not found")]
    SessionNotFound,

    #[error("Unauthenticated")]
    Unauthenticated,

    /// The transport layer did not hand a session to an operation that needs one.
    #[error("Could not resolve session from context")]
    SessionContextMissing,

    #[error("Session has no active portal")]
    NilActivePortal,

    #[error("Session has no user")]
    NilSessionUser,

    #[error("Session device has no identity provider session info")]
    NilIdpSessionInfo,

    #[error("Portal {0} is unavailable for this user")]
    UnavailablePortal(PortalId),

    #[error("Portal {0} has an empty URL")]
    EmptyPortalUrl(PortalId),

    /// Collaborator text is kept for logs only.
    #[error("Precondition failed")]
    Precondition(String),

    #[error("Not found")]
    NotFound(String),

    /// Per-field rejection from the session authority, passed through intact.
    #[error("'{field}': {message}")]
    Structured {
        field: String,
        message: String,
        reauth_required: bool,
    },

    /// Collaborator failure wrapped with the name of the failing operation.
    /// `message` carries the raw upstream text and is not displayed.
    #[error("Upstream call '{operation}' failed")]
    Upstream {
        operation: String,
        message: String,
        retryable: bool,
    },
}

impl AuthError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Validation failure for a required field left empty.
    pub fn empty_field(field: impl Into<String>) -> Self {
        AuthError::validation(field, "cannot be empty")
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::Validation { .. } => ErrorCode::ValidationFailed,
            AuthError::EmployeesNotFound => ErrorCode::EmployeesNotFound,
            AuthError::PermissionDenied => ErrorCode::PermissionDenied,
            AuthError::AccessDenied => ErrorCode::AccessDenied,
            AuthError::PortalsNotFound => ErrorCode::PortalsNotFound,
            AuthError::InvalidDevice => ErrorCode::InvalidDevice,
            AuthError::SessionNotFound => ErrorCode::SessionNotFound,
            AuthError::Unauthenticated => ErrorCode::Unauthenticated,
            AuthError::SessionContextMissing => ErrorCode::SessionContextMissing,
            AuthError::NilActivePortal
            | AuthError::NilSessionUser
            | AuthError::NilIdpSessionInfo
            | AuthError::Precondition(_) => ErrorCode::PreconditionFailed,
            AuthError::UnavailablePortal(_) => ErrorCode::UnavailablePortal,
            AuthError::EmptyPortalUrl(_) => ErrorCode::EmptyPortalUrl,
            AuthError::NotFound(_) => ErrorCode::NotFound,
            AuthError::Structured {
                reauth_required: true,
                ..
            } => ErrorCode::ReauthRequired,
            AuthError::Structured { .. } => ErrorCode::ValidationFailed,
            AuthError::Upstream {
                retryable: true, ..
            } => ErrorCode::UpstreamUnavailable,
            AuthError::Upstream { .. } => ErrorCode::UpstreamError,
        }
    }

    /// True when the browser must restart the login flow from the identity
    /// provider rather than retry the current call.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthenticated
                | AuthError::SessionNotFound
                | AuthError::SessionContextMissing
                | AuthError::Structured {
                    reauth_required: true,
                    ..
                }
        )
    }

    /// True for failures the caller may retry unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Upstream { retryable: true, .. })
    }
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        AuthError::Validation {
            field,
            message: err.to_string(),
        }
    }
}
