//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Identity provider, session authority and portal directory
//! - `http` - axum REST endpoints and middleware

pub mod auth;
pub mod http;

pub use auth::{InMemoryIdentityProvider, InMemoryPortalDirectory, InMemorySessionAuthority};
