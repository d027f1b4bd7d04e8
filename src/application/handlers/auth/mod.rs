//! Auth command handlers.

mod coordinator;
mod redirect_bridge;
mod settings;

pub use coordinator::{
    AuthCommand, AuthResult, ChangePortalResult, SessionLifecycleCoordinator,
    LOG_CODE_PORTALS_NOT_FOUND,
};
pub use redirect_bridge::RedirectSessionBridge;
pub use settings::CoordinatorSettings;
