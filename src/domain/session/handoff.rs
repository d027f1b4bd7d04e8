//! Cross-portal handoff payload.

use serde::{Deserialize, Serialize};

/// What the session authority needs to mint a short-lived handoff session
/// that lets a user hop from one portal back to another without logging in
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffPayload {
    pub session_id: String,
    pub email: String,
    pub snils: String,
    /// Host (and optional path prefix) of the portal the user came from,
    /// without a scheme.
    pub origin_portal_url: String,
    pub target_url: String,
    pub user_agent: String,
    pub ip: String,
}
