//! Collaborator adapters for the login flow.
//!
//! Implementations of the `IdentityProvider`, `SessionAuthority` and
//! `PortalDirectory` ports:
//!
//! - `in_memory` - Self-contained implementations for development and tests

mod in_memory;

pub use in_memory::{InMemoryIdentityProvider, InMemoryPortalDirectory, InMemorySessionAuthority};
