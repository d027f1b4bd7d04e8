//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, error codes)
//! - `auth` - Coordinator errors, upstream failure policy, device binding
//! - `identity` - What the identity provider tells us about a caller
//! - `portal` - Portals and the rules for selecting the active one
//! - `session` - Session record, devices and tokens

pub mod auth;
pub mod foundation;
pub mod identity;
pub mod portal;
pub mod session;
