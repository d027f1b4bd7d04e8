//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field } => field,
            ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
///
/// These are the machine-readable values the HTTP layer puts on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidDevice,

    // Not found errors
    EmployeesNotFound,
    PortalsNotFound,
    SessionNotFound,
    NotFound,

    // Authorization errors
    Unauthenticated,
    PermissionDenied,
    AccessDenied,
    ReauthRequired,

    // Session state errors
    SessionContextMissing,
    PreconditionFailed,
    UnavailablePortal,
    EmptyPortalUrl,

    // Infrastructure errors
    UpstreamUnavailable,
    UpstreamError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidDevice => "INVALID_DEVICE",
            ErrorCode::EmployeesNotFound => "EMPLOYEES_NOT_FOUND",
            ErrorCode::PortalsNotFound => "PORTALS_NOT_FOUND",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::ReauthRequired => "REAUTH_REQUIRED",
            ErrorCode::SessionContextMissing => "SESSION_CONTEXT_MISSING",
            ErrorCode::PreconditionFailed => "PRECONDITION_FAILED",
            ErrorCode::UnavailablePortal => "UNAVAILABLE_PORTAL",
            ErrorCode::EmptyPortalUrl => "EMPTY_PORTAL_URL",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
        };
        write!(f, "{}", s)
    }
}
