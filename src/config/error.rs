//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid callback base URL: {0}")]
    InvalidCallbackUrl(String),

    #[error("Callback base URL must use HTTPS in production")]
    CallbackMustBeHttps,

    #[error("Token TTL must be greater than zero")]
    InvalidTokenTtl,

    #[error("Refresh token TTL must exceed access token TTL")]
    RefreshTtlTooShort,

    #[error("Auth link path must start with '/'")]
    InvalidAuthLinkPath,
}
