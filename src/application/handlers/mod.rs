//! Application handlers.
//!
//! Handlers that orchestrate domain operations across ports.

pub mod auth;

pub use auth::{
    AuthCommand, AuthResult, ChangePortalResult, CoordinatorSettings, RedirectSessionBridge,
    SessionLifecycleCoordinator, LOG_CODE_PORTALS_NOT_FOUND,
};
