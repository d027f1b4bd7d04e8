//! SessionLifecycleCoordinator - login, session lookup, token refresh,
//! portal switching and logout.
//!
//! The coordinator sequences calls to the identity provider, the session
//! authority and the portal directory, and decides what each failure means
//! for the browser. It holds no mutable state: every call is independent and
//! all session state lives behind the session authority.
//!
//! ```text
//! Unauthenticated --auth--> SessionActive
//! SessionActive --refresh_tokens_pair--> SessionActive   (tokens rotated)
//! SessionActive --change_portal--> SessionActive         (active portal swapped)
//! SessionActive --logout--> Terminated
//! ```
//!
//! Upstream failures always go through [`ErrorClassifier`]; the coordinator
//! never retries.

use std::sync::Arc;

use crate::domain::auth::{
    mask_token, AuthError, DeviceBindingExtractor, ErrorClassifier, Operation, RequestContext,
};
use crate::domain::foundation::PortalId;
use crate::domain::portal::{mark_selected, Portal, PortalSelectionPolicy};
use crate::domain::session::{Session, TokensPair};
use crate::ports::{IdentityProvider, NewSession, PortalDirectory, SessionAuthority};

use super::settings::CoordinatorSettings;

pub use crate::domain::auth::LOG_CODE_PORTALS_NOT_FOUND;

/// Command to complete a login from the identity provider callback.
#[derive(Debug, Clone)]
pub struct AuthCommand {
    pub code: String,
    pub state: String,
    pub callback_uri: String,
    pub context: RequestContext,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub tokens: TokensPair,
    pub portal_session_id: String,
    pub portals: Vec<Portal>,
}

/// Result of switching the active portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePortalResult {
    pub portals: Vec<Portal>,
    pub portal_session_id: String,
}

pub struct SessionLifecycleCoordinator {
    identity_provider: Arc<dyn IdentityProvider>,
    session_authority: Arc<dyn SessionAuthority>,
    portal_directory: Arc<dyn PortalDirectory>,
    selection: PortalSelectionPolicy,
    settings: CoordinatorSettings,
}

impl SessionLifecycleCoordinator {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        session_authority: Arc<dyn SessionAuthority>,
        portal_directory: Arc<dyn PortalDirectory>,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            identity_provider,
            session_authority,
            portal_directory,
            selection: PortalSelectionPolicy::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Builds the identity-provider login URL for `callback_uri`.
    pub async fn get_auth_url(&self, callback_uri: &str) -> Result<String, AuthError> {
        let callback = self.settings.normalize_callback(callback_uri);

        self.identity_provider
            .redirect_url(&callback)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::GetAuthUrl, e))
    }

    /// Completes a login: identity exchange, access gate, portal
    /// authentication, device binding and token issuance, strictly in that
    /// order.
    pub async fn auth(&self, cmd: AuthCommand) -> Result<AuthResult, AuthError> {
        if cmd.code.is_empty() {
            return Err(AuthError::empty_field("code"));
        }
        if cmd.state.is_empty() {
            return Err(AuthError::empty_field("state"));
        }

        // 1. Exchange code/state for a verified identity
        let callback = self.settings.normalize_callback(&cmd.callback_uri);
        let identity = self
            .identity_provider
            .exchange_code(&cmd.code, &cmd.state, &callback)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::ExchangeCode, e))?;

        // 2. A verified identity must carry a user
        let Some(user) = identity.user.as_ref() else {
            return Err(ErrorClassifier::reject(Operation::Auth, AuthError::PermissionDenied, None));
        };
        let login = user.login.clone();

        // 3. Access allowlist
        if !self.settings.allowlist.permits(identity.email()) {
            return Err(ErrorClassifier::reject(
                Operation::Auth,
                AuthError::AccessDenied,
                Some(login.as_str()),
            ));
        }

        // 4. At least one portal membership
        if identity.portals.is_empty() {
            return Err(ErrorClassifier::reject(
                Operation::Auth,
                AuthError::PortalsNotFound,
                Some(login.as_str()),
            ));
        }

        // 5. Authenticate against the primary portal
        let primary = self
            .settings
            .primary_portal
            .pick(&identity.portals)
            .ok_or(AuthError::PortalsNotFound)?;
        let portal_auth = self
            .identity_provider
            .authenticate_against_portal(primary, &identity)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::AuthenticatePortal, e))?;

        // 6. Bind the device
        let mut binding = DeviceBindingExtractor::extract(&cmd.context)?;
        binding.device.user_login = login.clone();

        // 7. Mint the token pair
        let active_portal_id = portal_auth.portal.id;
        let portal_session_id = portal_auth.portal_session_id.clone();
        let portals = mark_selected(identity.portals.clone(), Some(active_portal_id));

        let tokens = self
            .session_authority
            .create_session(NewSession {
                identity,
                binding,
                portal_auth,
                issuer: self.settings.app_name.clone(),
                access_ttl: self.settings.access_ttl,
                refresh_ttl: self.settings.refresh_ttl,
            })
            .await
            .map_err(|e| {
                ErrorClassifier::resolve_for(Operation::CreateSession, e, Some(login.as_str()))
            })?;

        tracing::info!(login = %login, portal_id = %active_portal_id, "user authenticated");

        Ok(AuthResult {
            tokens,
            portal_session_id,
            portals,
        })
    }

    /// Resolves an access token into its session.
    pub async fn get_session(&self, access_token: &str) -> Result<Session, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::empty_field("access_token"));
        }

        let masked = mask_token(access_token);
        match self.session_authority.get_session(access_token).await {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(ErrorClassifier::reject(
                Operation::GetSession,
                AuthError::SessionNotFound,
                Some(masked.as_str()),
            )),
            Err(e) => Err(ErrorClassifier::resolve_for(
                Operation::GetSession,
                e,
                Some(masked.as_str()),
            )),
        }
    }

    /// Ends a session on both the client and the server side.
    ///
    /// Preconditions are checked in a fixed order and the first missing piece
    /// is reported: session, access token, refresh token, active portal,
    /// user, identity-provider session info.
    pub async fn logout(
        &self,
        session: Option<&Session>,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        let session = session.ok_or(AuthError::SessionContextMissing)?;

        if access_token.is_empty() {
            return Err(AuthError::empty_field("access_token"));
        }
        if refresh_token.is_empty() {
            return Err(AuthError::empty_field("refresh_token"));
        }
        if session.active_portal.is_none() {
            return Err(AuthError::NilActivePortal);
        }
        if session.user.is_none() {
            return Err(AuthError::NilSessionUser);
        }
        if session.device.idp_session_info.is_none() {
            return Err(AuthError::NilIdpSessionInfo);
        }

        self.session_authority
            .logout(session, access_token, refresh_token)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::Logout, e))?;

        tracing::info!(session_id = %session.id, "session terminated");
        Ok(())
    }

    /// Switches the session's active portal to `portal_id`.
    pub async fn change_portal(
        &self,
        session: Option<&Session>,
        portal_id: PortalId,
    ) -> Result<ChangePortalResult, AuthError> {
        let session = session.ok_or(AuthError::SessionContextMissing)?;

        let switch = self
            .session_authority
            .change_active_portal(portal_id, session)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::ChangePortal, e))?;

        let (_, portals) = self
            .selection
            .select(portal_id, switch.portals)
            .into_result()
            .map_err(|e| {
                let session_id = session.id.to_string();
                ErrorClassifier::reject(Operation::ChangePortal, e, Some(session_id.as_str()))
            })?;

        tracing::info!(session_id = %session.id, portal_id = %portal_id, "active portal changed");

        Ok(ChangePortalResult {
            portals,
            portal_session_id: switch.portal_session_id,
        })
    }

    /// Rotates the token pair.
    ///
    /// A per-field rejection from the session authority is returned intact so
    /// the caller can see `reauth_required`.
    pub async fn refresh_tokens_pair(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokensPair, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::empty_field("access_token"));
        }
        if refresh_token.is_empty() {
            return Err(AuthError::empty_field("refresh_token"));
        }

        self.session_authority
            .refresh_tokens_pair(access_token, refresh_token)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::RefreshTokens, e))
    }

    /// Lists the portals the session's user belongs to, flagging the active one.
    pub async fn list_portals(&self, session: Option<&Session>) -> Result<Vec<Portal>, AuthError> {
        let session = session.ok_or(AuthError::SessionContextMissing)?;
        let user = session.user.as_ref().ok_or(AuthError::NilSessionUser)?;

        if user.portal_ids.is_empty() {
            return Err(AuthError::PortalsNotFound);
        }

        let portals = self
            .portal_directory
            .filter(&user.portal_ids)
            .await
            .map_err(|e| ErrorClassifier::resolve(Operation::ListPortals, e))?;

        if portals.is_empty() {
            return Err(AuthError::PortalsNotFound);
        }

        Ok(mark_selected(portals, session.active_portal_id()))
    }
}
