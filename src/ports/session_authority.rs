//! Session authority port.
//!
//! The session authority owns every [`Session`] record. It issues, validates
//! and rotates token pairs, switches the active portal and terminates
//! sessions. The gateway reaches it only through this trait and keeps no
//! session state of its own.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::auth::{DeviceBinding, UpstreamError};
use crate::domain::foundation::PortalId;
use crate::domain::identity::{IdentityRecord, PortalAuth};
use crate::domain::portal::Portal;
use crate::domain::session::{HandoffPayload, Session, TokensPair};

/// Everything the authority needs to mint a session after a login.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub identity: IdentityRecord,
    pub binding: DeviceBinding,
    pub portal_auth: PortalAuth,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Result of switching a session to another portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSwitch {
    pub portals: Vec<Portal>,
    pub portal_session_id: String,
}

/// Client for the session authority.
///
/// # Contract
///
/// Implementations must:
/// - Re-check portal memberships in `create_session` and report an empty list
///   as `UpstreamError::Localized` with [`NO_PORTALS_CODE`](crate::domain::auth::NO_PORTALS_CODE)
/// - Return `Ok(None)` from `get_session` for a well-formed token that
///   resolves to no session
/// - Report refresh-token rejections as `UpstreamError::Structured`, setting
///   `reauth_required` when only a fresh login can recover
/// - Return `UpstreamError::Transient` for transport failures
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    async fn create_session(&self, request: NewSession) -> Result<TokensPair, UpstreamError>;

    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, UpstreamError>;

    /// Invalidates the session server-side.
    async fn logout(
        &self,
        session: &Session,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), UpstreamError>;

    async fn change_active_portal(
        &self,
        portal_id: PortalId,
        session: &Session,
    ) -> Result<PortalSwitch, UpstreamError>;

    async fn refresh_tokens_pair(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokensPair, UpstreamError>;

    /// Mints a short-lived cross-portal handoff session and returns its id.
    async fn create_handoff_session(&self, payload: &HandoffPayload) -> Result<String, UpstreamError>;
}
