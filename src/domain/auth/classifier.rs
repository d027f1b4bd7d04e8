//! Upstream failure policy.
//!
//! Every coordinator operation routes collaborator failures through
//! [`ErrorClassifier`]. For each `(operation, error)` pair it decides
//!
//! - the log severity,
//! - whether the error passes through with its meaning intact or is wrapped
//!   with the failing operation's name,
//! - whether the caller may retry.
//!
//! It also owns the handful of operation-specific translations, such as an
//! identity-provider "not found" becoming [`AuthError::EmployeesNotFound`].
//! The coordinator never performs retries itself.

use std::fmt;

/// Structured log code for logins that end with no portal memberships.
pub const LOG_CODE_PORTALS_NOT_FOUND: &str = "AUTH_PORTALS_NOT_FOUND";

use super::errors::AuthError;
use super::upstream::UpstreamError;

/// Upstream call sites the classifier knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAuthUrl,
    /// The login flow's own gates, between code exchange and session creation.
    Auth,
    ExchangeCode,
    AuthenticatePortal,
    CreateSession,
    GetSession,
    Logout,
    ChangePortal,
    RefreshTokens,
    ListPortals,
    CreateHandoff,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAuthUrl => "get_auth_url",
            Operation::Auth => "auth",
            Operation::ExchangeCode => "exchange_code",
            Operation::AuthenticatePortal => "authenticate_portal",
            Operation::CreateSession => "create_session",
            Operation::GetSession => "get_session",
            Operation::Logout => "logout",
            Operation::ChangePortal => "change_portal",
            Operation::RefreshTokens => "refresh_tokens_pair",
            Operation::ListPortals => "list_portals",
            Operation::CreateHandoff => "create_handoff_session",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
}

/// Whether an upstream error keeps its meaning or is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    PassThrough,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub severity: LogSeverity,
    pub disposition: Disposition,
    pub retryable: bool,
}

impl Classification {
    const fn new(severity: LogSeverity, disposition: Disposition, retryable: bool) -> Self {
        Self {
            severity,
            disposition,
            retryable,
        }
    }

    pub fn with_severity(mut self, severity: LogSeverity) -> Self {
        self.severity = severity;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Baseline policy for an error shape, independent of call site.
    pub fn baseline(err: &UpstreamError) -> Classification {
        use Disposition::*;
        use LogSeverity::*;

        match err {
            UpstreamError::Validation { .. } => Classification::new(Debug, PassThrough, false),
            UpstreamError::Precondition(_) => Classification::new(Warn, PassThrough, false),
            UpstreamError::NotFound(_) => Classification::new(Warn, PassThrough, false),
            UpstreamError::PermissionDenied(_) => Classification::new(Warn, PassThrough, false),
            UpstreamError::Unauthenticated(_) => Classification::new(Debug, PassThrough, false),
            UpstreamError::Localized { .. } => Classification::new(Error, Wrap, false),
            UpstreamError::Structured { .. } => Classification::new(Warn, PassThrough, false),
            UpstreamError::Transient(_) => Classification::new(Error, Wrap, true),
        }
    }

    /// Policy for an error raised by a specific operation.
    pub fn classify(operation: Operation, err: &UpstreamError) -> Classification {
        let baseline = Self::baseline(err);

        match (operation, err) {
            // A failed code exchange is either the user's fault or ours.
            (Operation::ExchangeCode, UpstreamError::Validation { .. }) => baseline,
            (Operation::ExchangeCode, _) => baseline.with_severity(LogSeverity::Error),
            // Missing portals is an expected dead end, logged separately by the caller.
            (Operation::CreateSession, e) if e.is_no_portals() => Classification::new(
                LogSeverity::Warn,
                Disposition::PassThrough,
                false,
            ),
            // Token lookups fail routinely; keep them out of the error stream.
            (Operation::GetSession, _) => baseline.with_severity(LogSeverity::Warn),
            // The login link is built by the IdP client alone; any failure is ours.
            (Operation::GetAuthUrl, _) => Classification {
                disposition: Disposition::Wrap,
                ..baseline
            },
            // One leg of a browser redirect chain; the caller only needs the call site.
            (Operation::CreateHandoff, _) => Classification {
                disposition: Disposition::Wrap,
                ..baseline
            },
            _ => baseline,
        }
    }

    /// Severity for a failure raised by the coordinator itself rather than
    /// by a collaborator.
    pub fn severity_for(err: &AuthError) -> LogSeverity {
        match err {
            AuthError::Validation { .. }
            | AuthError::InvalidDevice
            | AuthError::SessionContextMissing => LogSeverity::Debug,
            AuthError::EmptyPortalUrl(_) | AuthError::Upstream { .. } => LogSeverity::Error,
            _ => LogSeverity::Warn,
        }
    }

    /// Logs a coordinator-level rejection at [`severity_for`](Self::severity_for)
    /// and hands the error back.
    pub fn reject(operation: Operation, err: AuthError, subject: Option<&str>) -> AuthError {
        emit(
            Self::severity_for(&err),
            operation,
            &err,
            subject,
            log_code(&err),
            "request rejected",
        );
        err
    }

    /// Logs the failure at its classified severity and converts it into the
    /// coordinator's error vocabulary.
    pub fn resolve(operation: Operation, err: UpstreamError) -> AuthError {
        Self::resolve_for(operation, err, None)
    }

    /// Like [`resolve`](Self::resolve), attaching an already-masked subject
    /// (for example a token) to the log event.
    pub fn resolve_for(operation: Operation, err: UpstreamError, subject: Option<&str>) -> AuthError {
        let classification = Self::classify(operation, &err);
        let detail = err.to_string();
        let resolved = Self::translate(operation, err, classification);
        emit(
            classification.severity,
            operation,
            &detail,
            subject,
            log_code(&resolved),
            "upstream call failed",
        );
        resolved
    }

    fn translate(operation: Operation, err: UpstreamError, classification: Classification) -> AuthError {
        match (operation, err) {
            (Operation::ExchangeCode, UpstreamError::NotFound(_)) => AuthError::EmployeesNotFound,
            (Operation::CreateSession, e) if e.is_no_portals() => AuthError::PortalsNotFound,
            (Operation::GetSession, UpstreamError::NotFound(_)) => AuthError::SessionNotFound,
            (_, err) => match classification.disposition {
                Disposition::PassThrough => pass_through(operation, err, classification),
                Disposition::Wrap => wrap(operation, &err, classification),
            },
        }
    }
}

fn pass_through(operation: Operation, err: UpstreamError, classification: Classification) -> AuthError {
    match err {
        UpstreamError::Validation { field, message } => AuthError::Validation { field, message },
        UpstreamError::Precondition(message) => AuthError::Precondition(message),
        UpstreamError::NotFound(message) => AuthError::NotFound(message),
        UpstreamError::PermissionDenied(_) => AuthError::PermissionDenied,
        UpstreamError::Unauthenticated(_) => AuthError::Unauthenticated,
        UpstreamError::Structured {
            field,
            message,
            reauth_required,
        } => AuthError::Structured {
            field,
            message,
            reauth_required,
        },
        other => wrap(operation, &other, classification),
    }
}

fn wrap(operation: Operation, err: &UpstreamError, classification: Classification) -> AuthError {
    AuthError::Upstream {
        operation: operation.as_str().to_string(),
        message: err.to_string(),
        retryable: classification.retryable,
    }
}

fn log_code(err: &AuthError) -> Option<&'static str> {
    match err {
        AuthError::PortalsNotFound => Some(LOG_CODE_PORTALS_NOT_FOUND),
        _ => None,
    }
}

fn emit(
    severity: LogSeverity,
    operation: Operation,
    err: &dyn fmt::Display,
    subject: Option<&str>,
    log_code: Option<&'static str>,
    message: &'static str,
) {
    let operation = operation.as_str();
    match severity {
        LogSeverity::Debug => tracing::debug!(operation, subject, log_code, error = %err, "{}", message),
        LogSeverity::Info => tracing::info!(operation, subject, log_code, error = %err, "{}", message),
        LogSeverity::Warn => tracing::warn!(operation, subject, log_code, error = %err, "{}", message),
        LogSeverity::Error => tracing::error!(operation, subject, log_code, error = %err, "{}", message),
    }
}
