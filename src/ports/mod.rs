//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `IdentityProvider` - Login redirect, code exchange, portal authentication
//! - `SessionAuthority` - Owns sessions and issues/validates/rotates tokens
//! - `PortalDirectory` - Resolves portal ids to display records
//!
//! All failures cross these ports as `UpstreamError`.

mod identity_provider;
mod portal_directory;
mod session_authority;

pub use identity_provider::IdentityProvider;
pub use portal_directory::PortalDirectory;
pub use session_authority::{NewSession, PortalSwitch, SessionAuthority};
