//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! It holds no state of its own; sessions and tokens live behind the
//! session authority.

pub mod handlers;

pub use handlers::{
    AuthCommand, AuthResult, ChangePortalResult, CoordinatorSettings, RedirectSessionBridge,
    SessionLifecycleCoordinator,
};
