//! RedirectSessionBridge - cross-portal handoff.
//!
//! Mints a short-lived handoff id at the session authority and builds the
//! URL that sends the browser back to the origin portal with it.

use std::sync::Arc;

use url::Url;

use crate::domain::auth::{AuthError, ErrorClassifier, Operation};
use crate::domain::session::HandoffPayload;
use crate::ports::SessionAuthority;

pub struct RedirectSessionBridge {
    session_authority: Arc<dyn SessionAuthority>,
    auth_link_path: String,
}

impl RedirectSessionBridge {
    pub fn new(session_authority: Arc<dyn SessionAuthority>, auth_link_path: impl Into<String>) -> Self {
        Self {
            session_authority,
            auth_link_path: auth_link_path.into(),
        }
    }

    /// Returns `https://{origin}{auth_link_path}?state={handoff_id}`.
    pub async fn handoff(&self, payload: Option<HandoffPayload>) -> Result<String, AuthError> {
        let payload = payload.ok_or_else(|| AuthError::validation("payload", "cannot be nil"))?;

        let origin = payload.origin_portal_url.trim();
        if origin.is_empty() {
            return Err(AuthError::empty_field("origin_portal_url"));
        }

        // Parse before minting so a bad origin never leaves a dangling handoff.
        let mut redirect = Url::parse(&format!("https://{}{}", origin, self.auth_link_path))
            .map_err(|e| AuthError::validation("origin_portal_url", e.to_string()))?;

        let handoff_id = self
            .session_authority
            .create_handoff_session(&payload)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::CreateHandoff, e))?;

        redirect.query_pairs_mut().append_pair("state", &handoff_id);

        tracing::debug!(session_id = %payload.session_id, origin = %origin, "handoff redirect issued");

        Ok(redirect.into())
    }
}
