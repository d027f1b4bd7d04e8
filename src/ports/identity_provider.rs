//! Identity provider port.
//!
//! The first authentication leg: the browser is redirected to the corporate
//! identity provider, comes back with a `code`/`state` pair, and the gateway
//! exchanges them for a verified identity. The second leg, authenticating
//! the identity against a single portal, goes through the same client.
//!
//! The gateway does not implement the OAuth/OpenID protocol itself; it only
//! shapes the callback URL and forwards opaque values.

use async_trait::async_trait;
use url::Url;

use crate::domain::auth::UpstreamError;
use crate::domain::identity::{IdentityRecord, PortalAuth};
use crate::domain::portal::Portal;

/// Client for the corporate identity provider.
///
/// # Contract
///
/// Implementations must:
/// - Return `UpstreamError::Validation` when the provider rejects `code` or `state`
/// - Return `UpstreamError::NotFound` when the person has no linked employee record
/// - Return `UpstreamError::Transient` for transport failures
/// - Propagate the caller's cancellation unchanged
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Builds the URL the browser is sent to in order to log in.
    async fn redirect_url(&self, callback: &Url) -> Result<String, UpstreamError>;

    /// Exchanges the authorization `code` and `state` for a verified identity.
    async fn exchange_code(
        &self,
        code: &str,
        state: &str,
        callback: &Url,
    ) -> Result<IdentityRecord, UpstreamError>;

    /// Authenticates the identity within one portal, returning the portal
    /// authority's own session handle.
    async fn authenticate_against_portal(
        &self,
        portal: &Portal,
        identity: &IdentityRecord,
    ) -> Result<PortalAuth, UpstreamError>;
}
