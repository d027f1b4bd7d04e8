//! HTTP middleware for axum.
//!
//! This module contains middleware layers and extractors for cross-cutting
//! concerns:
//!
//! - `request_context` - Device and client IP extraction
//! - `session` - Bearer token to session resolution

pub mod request_context;
pub mod session;

pub use request_context::{request_context_from_headers, ClientContext};
pub use session::{
    bearer_token, session_middleware, AuthenticatedSession, OptionalSession, SessionState,
};
