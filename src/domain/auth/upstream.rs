//! Failure shapes reported by upstream collaborators.
//!
//! Adapters for the identity provider, session authority and portal
//! directory translate whatever their transport gives them into one of these
//! variants. The set is closed so the classifier can be a total match.

use thiserror::Error;

/// Business-rule code the session authority uses when an identity has no
/// portal memberships.
pub const NO_PORTALS_CODE: &str = "portals_not_found";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The collaborator rejected caller-supplied input.
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The collaborator's own state was not ready for the request.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Named business rule violation carrying a machine code.
    #[error("[{code}] {message}")]
    Localized { code: String, message: String },

    /// Per-field rejection the caller must act on, e.g. a refresh token that
    /// can no longer be used.
    #[error("'{field}': {message}")]
    Structured {
        field: String,
        message: String,
        reauth_required: bool,
    },

    /// Transport or service failure.
    #[error("transport error: {0}")]
    Transient(String),
}

impl UpstreamError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn localized(code: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::Localized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn structured(
        field: impl Into<String>,
        message: impl Into<String>,
        reauth_required: bool,
    ) -> Self {
        UpstreamError::Structured {
            field: field.into(),
            message: message.into(),
            reauth_required,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        UpstreamError::Transient(message.into())
    }

    /// True when the session authority reports that the identity has no
    /// portal memberships.
    pub fn is_no_portals(&self) -> bool {
        matches!(self, UpstreamError::Localized { code, .. } if code == NO_PORTALS_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_no_portals_matches_only_the_dedicated_code() {
        assert!(UpstreamError::localized(NO_PORTALS_CODE, "no memberships").is_no_portals());
        assert!(!UpstreamError::localized("other", "x").is_no_portals());
        assert!(!UpstreamError::NotFound(NO_PORTALS_CODE.to_string()).is_no_portals());
    }

    #[test]
    fn structured_error_displays_field() {
        let err = UpstreamError::structured("refresh_token", "expired", true);
        assert_eq!(err.to_string(), "'refresh_token': expired");
    }
}
