//! In-memory collaborator adapters.
//!
//! These adapters implement the `IdentityProvider`, `SessionAuthority` and
//! `PortalDirectory` ports without any external service. They back the
//! development binary and the test suites.
//!
//! Every adapter can be told to fail a specific operation and counts the
//! calls it receives, so tests can assert that a flow stopped before a
//! given upstream call.
//!
//! # Example
//!
//! ```ignore
//! use portal_bff::adapters::auth::InMemoryIdentityProvider;
//! use portal_bff::domain::auth::{Operation, UpstreamError};
//!
//! let idp = InMemoryIdentityProvider::new()
//!     .with_failure(Operation::ExchangeCode, UpstreamError::transient("down"));
//!
//! assert_eq!(idp.call_count(Operation::ExchangeCode), 0);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::domain::auth::{Operation, UpstreamError, NO_PORTALS_CODE};
use crate::domain::foundation::{PortalId, SessionId, Timestamp};
use crate::domain::identity::{IdentityRecord, PortalAuth};
use crate::domain::portal::{ActivePortal, Portal};
use crate::domain::session::{AuthType, HandoffPayload, Session, Token, TokensPair};
use crate::ports::{IdentityProvider, NewSession, PortalDirectory, PortalSwitch, SessionAuthority};

const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://idp.example.com/oauth2/authorize";
const DEFAULT_CLIENT_ID: &str = "portal-bff";

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Per-operation forced failures and call counters.
#[derive(Debug, Default)]
struct Faults {
    failures: RwLock<HashMap<Operation, UpstreamError>>,
    calls: RwLock<HashMap<Operation, usize>>,
}

impl Faults {
    fn set(&self, operation: Operation, error: UpstreamError) {
        write(&self.failures).insert(operation, error);
    }

    fn clear(&self) {
        write(&self.failures).clear();
    }

    /// Records the call and returns the forced failure, if any.
    fn enter(&self, operation: Operation) -> Result<(), UpstreamError> {
        *write(&self.calls).entry(operation).or_default() += 1;
        match read(&self.failures).get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn count(&self, operation: Operation) -> usize {
        read(&self.calls).get(&operation).copied().unwrap_or_default()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Identity provider
// ════════════════════════════════════════════════════════════════════════════════

/// Identity provider that resolves every code to one configured identity.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    authorize_endpoint: String,
    client_id: String,
    identity: RwLock<Option<IdentityRecord>>,
    authenticated: RwLock<Vec<PortalId>>,
    faults: Faults,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self {
            authorize_endpoint: DEFAULT_AUTHORIZE_ENDPOINT.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            identity: RwLock::new(None),
            authenticated: RwLock::new(Vec::new()),
            faults: Faults::default(),
        }
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorize_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorize_endpoint = endpoint.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Sets the identity every code exchange resolves to.
    pub fn with_identity(self, identity: IdentityRecord) -> Self {
        *write(&self.identity) = Some(identity);
        self
    }

    pub fn with_failure(self, operation: Operation, error: UpstreamError) -> Self {
        self.faults.set(operation, error);
        self
    }

    /// Forces `operation` to fail from now on.
    pub fn fail(&self, operation: Operation, error: UpstreamError) {
        self.faults.set(operation, error);
    }

    pub fn clear_failures(&self) {
        self.faults.clear();
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.faults.count(operation)
    }

    /// Portals authenticated against, in call order.
    pub fn authenticated_portals(&self) -> Vec<PortalId> {
        read(&self.authenticated).clone()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn redirect_url(&self, callback: &Url) -> Result<String, UpstreamError> {
        self.faults.enter(Operation::GetAuthUrl)?;

        let state = Uuid::new_v4().to_string();
        let url = Url::parse_with_params(
            &self.authorize_endpoint,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", callback.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| UpstreamError::transient(format!("invalid authorize endpoint: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        _code: &str,
        _state: &str,
        _callback: &Url,
    ) -> Result<IdentityRecord, UpstreamError> {
        self.faults.enter(Operation::ExchangeCode)?;

        read(&self.identity)
            .clone()
            .ok_or_else(|| UpstreamError::NotFound("no employee linked to this account".to_string()))
    }

    async fn authenticate_against_portal(
        &self,
        portal: &Portal,
        identity: &IdentityRecord,
    ) -> Result<PortalAuth, UpstreamError> {
        self.faults.enter(Operation::AuthenticatePortal)?;
        write(&self.authenticated).push(portal.id);

        let employee_id = identity
            .employees
            .iter()
            .find(|e| e.portal_id == portal.id)
            .map(|e| e.employee_id.clone())
            .unwrap_or_default();
        let person_id = identity
            .user
            .as_ref()
            .map(|u| u.id.to_string())
            .unwrap_or_default();

        Ok(PortalAuth {
            portal: portal.clone(),
            portal_session_id: portal_session_id(portal.id),
            employee_id,
            person_id,
        })
    }
}

fn portal_session_id(portal_id: PortalId) -> String {
    format!("ps-{}", portal_id)
}

// ════════════════════════════════════════════════════════════════════════════════
// Session authority
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct StoredSession {
    session: Session,
    refresh_token: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Session authority keeping sessions in a map keyed by access token.
#[derive(Debug, Default)]
pub struct InMemorySessionAuthority {
    sessions: RwLock<HashMap<String, StoredSession>>,
    portals: RwLock<Vec<Portal>>,
    handoffs: RwLock<Vec<(String, HandoffPayload)>>,
    faults: Faults,
}

impl InMemorySessionAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_portals(self, portals: Vec<Portal>) -> Self {
        self.set_portals(portals);
        self
    }

    pub fn with_failure(self, operation: Operation, error: UpstreamError) -> Self {
        self.faults.set(operation, error);
        self
    }

    /// Replaces the portal list returned by portal changes.
    pub fn set_portals(&self, portals: Vec<Portal>) {
        *write(&self.portals) = portals;
    }

    pub fn fail(&self, operation: Operation, error: UpstreamError) {
        self.faults.set(operation, error);
    }

    pub fn clear_failures(&self) {
        self.faults.clear();
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.faults.count(operation)
    }

    pub fn session_count(&self) -> usize {
        read(&self.sessions).len()
    }

    /// Issued handoffs as `(handoff_id, payload)`.
    pub fn handoffs(&self) -> Vec<(String, HandoffPayload)> {
        read(&self.handoffs).clone()
    }

    fn remember_portals(&self, portals: &[Portal]) {
        let mut known = write(&self.portals);
        for portal in portals {
            if !known.iter().any(|p| p.id == portal.id) {
                known.push(Portal {
                    is_selected: false,
                    ..portal.clone()
                });
            }
        }
    }
}

fn mint_pair(now: Timestamp, access_ttl: Duration, refresh_ttl: Duration) -> TokensPair {
    TokensPair::new(
        Token::new(
            format!("at-{}", Uuid::new_v4()),
            Some(now.plus_secs(access_ttl.as_secs())),
        ),
        Token::new(
            format!("rt-{}", Uuid::new_v4()),
            Some(now.plus_secs(refresh_ttl.as_secs())),
        ),
    )
}

fn invalid_refresh(message: &str) -> UpstreamError {
    UpstreamError::structured("refresh_token", message, true)
}

#[async_trait]
impl SessionAuthority for InMemorySessionAuthority {
    async fn create_session(&self, request: NewSession) -> Result<TokensPair, UpstreamError> {
        self.faults.enter(Operation::CreateSession)?;

        if request.identity.portals.is_empty() {
            return Err(UpstreamError::localized(
                NO_PORTALS_CODE,
                "identity has no portal memberships",
            ));
        }

        let now = Timestamp::now();
        let tokens = mint_pair(now, request.access_ttl, request.refresh_ttl);

        let mut device = request.binding.device;
        device.fingerprint = request.binding.fingerprint;
        if device.idp_session_info.is_none() {
            device = device.with_idp_session(format!("sid-{}", Uuid::new_v4()), &request.issuer);
        }
        let subject = request
            .identity
            .login()
            .map(str::to_string)
            .unwrap_or_default();
        let active_portal = ActivePortal::new(
            Portal {
                is_selected: true,
                ..request.portal_auth.portal
            },
            request.portal_auth.portal_session_id,
        );

        self.remember_portals(&request.identity.portals);

        let session = Session {
            id: SessionId::new(),
            user: request.identity.user,
            auth_type: AuthType::PrimaryAuth,
            user_ip: request.binding.client_ip,
            device,
            active_portal: Some(active_portal),
            issuer: request.issuer,
            subject,
            last_active_at: now,
            access_expires_at: now.plus_secs(request.access_ttl.as_secs()),
            refresh_expires_at: now.plus_secs(request.refresh_ttl.as_secs()),
            created_at: now,
            refreshed_at: None,
            is_active: true,
        };

        write(&self.sessions).insert(
            tokens.access_token.value.clone(),
            StoredSession {
                session,
                refresh_token: tokens.refresh_token.value.clone(),
                access_ttl: request.access_ttl,
                refresh_ttl: request.refresh_ttl,
            },
        );

        Ok(tokens)
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, UpstreamError> {
        self.faults.enter(Operation::GetSession)?;

        let sessions = read(&self.sessions);
        let Some(stored) = sessions.get(access_token) else {
            return Ok(None);
        };
        if stored.session.is_access_expired(&Timestamp::now()) {
            return Err(UpstreamError::Unauthenticated(
                "access token expired".to_string(),
            ));
        }

        Ok(Some(stored.session.clone()))
    }

    async fn logout(
        &self,
        session: &Session,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), UpstreamError> {
        self.faults.enter(Operation::Logout)?;

        let mut sessions = write(&self.sessions);
        match sessions.get(access_token) {
            Some(stored) if stored.session.id == session.id => {
                if stored.refresh_token != refresh_token {
                    return Err(UpstreamError::validation(
                        "refresh_token",
                        "does not belong to this session",
                    ));
                }
                sessions.remove(access_token);
                Ok(())
            }
            _ => Err(UpstreamError::NotFound("session".to_string())),
        }
    }

    async fn change_active_portal(
        &self,
        portal_id: PortalId,
        session: &Session,
    ) -> Result<PortalSwitch, UpstreamError> {
        self.faults.enter(Operation::ChangePortal)?;

        let portals = read(&self.portals).clone();
        let portal_session_id = portal_session_id(portal_id);

        if let Some(portal) = portals.iter().find(|p| p.id == portal_id) {
            let mut sessions = write(&self.sessions);
            for stored in sessions.values_mut().filter(|s| s.session.id == session.id) {
                stored.session.active_portal = Some(ActivePortal::new(
                    Portal {
                        is_selected: true,
                        ..portal.clone()
                    },
                    portal_session_id.clone(),
                ));
            }
        }

        Ok(PortalSwitch {
            portals,
            portal_session_id,
        })
    }

    async fn refresh_tokens_pair(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokensPair, UpstreamError> {
        self.faults.enter(Operation::RefreshTokens)?;

        let mut sessions = write(&self.sessions);
        let stored = sessions
            .get(access_token)
            .ok_or_else(|| invalid_refresh("refresh token is invalid"))?;
        if stored.refresh_token != refresh_token {
            return Err(invalid_refresh("refresh token is invalid"));
        }

        let now = Timestamp::now();
        if stored.session.refresh_expires_at.is_before(&now) {
            sessions.remove(access_token);
            return Err(invalid_refresh("refresh token expired"));
        }

        let Some(mut stored) = sessions.remove(access_token) else {
            return Err(invalid_refresh("refresh token is invalid"));
        };
        let tokens = mint_pair(now, stored.access_ttl, stored.refresh_ttl);
        stored.refresh_token = tokens.refresh_token.value.clone();
        stored.session.refreshed_at = Some(now);
        stored.session.last_active_at = now;
        stored.session.access_expires_at = now.plus_secs(stored.access_ttl.as_secs());
        stored.session.refresh_expires_at = now.plus_secs(stored.refresh_ttl.as_secs());
        sessions.insert(tokens.access_token.value.clone(), stored);

        Ok(tokens)
    }

    async fn create_handoff_session(&self, payload: &HandoffPayload) -> Result<String, UpstreamError> {
        self.faults.enter(Operation::CreateHandoff)?;

        let handoff_id = format!("ho-{}", Uuid::new_v4());
        write(&self.handoffs).push((handoff_id.clone(), payload.clone()));
        Ok(handoff_id)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Portal directory
// ════════════════════════════════════════════════════════════════════════════════

/// Portal directory backed by a map of known portals.
#[derive(Debug, Default)]
pub struct InMemoryPortalDirectory {
    portals: RwLock<HashMap<PortalId, Portal>>,
    faults: Faults,
}

impl InMemoryPortalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_portal(self, portal: Portal) -> Self {
        self.add_portal(portal);
        self
    }

    pub fn with_failure(self, error: UpstreamError) -> Self {
        self.faults.set(Operation::ListPortals, error);
        self
    }

    pub fn add_portal(&self, portal: Portal) {
        write(&self.portals).insert(portal.id, portal);
    }

    pub fn call_count(&self) -> usize {
        self.faults.count(Operation::ListPortals)
    }
}

#[async_trait]
impl PortalDirectory for InMemoryPortalDirectory {
    async fn filter(&self, ids: &[PortalId]) -> Result<Vec<Portal>, UpstreamError> {
        self.faults.enter(Operation::ListPortals)?;

        let portals = read(&self.portals);
        Ok(ids.iter().filter_map(|id| portals.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{fingerprint, DeviceBinding};
    use crate::domain::foundation::UserId;
    use crate::domain::session::{Device, User};

    fn identity(portals: Vec<Portal>) -> IdentityRecord {
        IdentityRecord {
            user: Some(User {
                id: UserId::new("cloud-1").unwrap(),
                login: "jdoe".to_string(),
                email: "jdoe@corp.example".to_string(),
                full_name: "John Doe".to_string(),
                portal_ids: portals.iter().map(|p| p.id).collect(),
            }),
            portals,
            employees: vec![],
        }
    }

    fn new_session(identity: IdentityRecord) -> NewSession {
        let portal = identity.portals.first().cloned().unwrap_or_else(|| Portal::new(1, "One", "u"));
        NewSession {
            identity,
            binding: DeviceBinding {
                device: Device::new("Mozilla/5.0").with_login("jdoe"),
                client_ip: "10.0.0.1".to_string(),
                fingerprint: fingerprint("Mozilla/5.0", "10.0.0.1"),
            },
            portal_auth: PortalAuth {
                portal,
                portal_session_id: "ps-1".to_string(),
                employee_id: "emp-1".to_string(),
                person_id: "cloud-1".to_string(),
            },
            issuer: "portal-bff".to_string(),
            access_ttl: Duration::from_secs(900),
            refresh_ttl: Duration::from_secs(3600),
        }
    }

    fn callback() -> Url {
        Url::parse("https://portal.example.com/auth/callback").unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Identity provider
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn redirect_url_carries_client_and_callback() {
        let idp = InMemoryIdentityProvider::new().with_client_id("bff");

        let url = Url::parse(&idp.redirect_url(&callback()).await.unwrap()).unwrap();
        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(params.get("client_id").map(String::as_str), Some("bff"));
        assert_eq!(
            params.get("redirect_uri").map(String::as_str),
            Some("https://portal.example.com/auth/callback")
        );
        assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
    }

    #[tokio::test]
    async fn exchange_without_identity_is_not_found() {
        let idp = InMemoryIdentityProvider::new();

        let result = idp.exchange_code("c", "s", &callback()).await;

        assert!(matches!(result, Err(UpstreamError::NotFound(_))));
        assert_eq!(idp.call_count(Operation::ExchangeCode), 1);
    }

    #[tokio::test]
    async fn forced_failure_is_returned_and_counted() {
        let idp = InMemoryIdentityProvider::new()
            .with_identity(identity(vec![]))
            .with_failure(Operation::ExchangeCode, UpstreamError::transient("down"));

        let result = idp.exchange_code("c", "s", &callback()).await;
        assert_eq!(result, Err(UpstreamError::transient("down")));

        idp.clear_failures();
        assert!(idp.exchange_code("c", "s", &callback()).await.is_ok());
        assert_eq!(idp.call_count(Operation::ExchangeCode), 2);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Session authority
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_session_rejects_identity_without_portals() {
        let authority = InMemorySessionAuthority::new();

        let result = authority.create_session(new_session(identity(vec![]))).await;

        assert!(result.unwrap_err().is_no_portals());
        assert_eq!(authority.session_count(), 0);
    }

    #[tokio::test]
    async fn created_session_is_resolvable_by_access_token() {
        let authority = InMemorySessionAuthority::new();
        let tokens = authority
            .create_session(new_session(identity(vec![Portal::new(1, "One", "https://p1")])))
            .await
            .unwrap();

        let session = authority
            .get_session(&tokens.access_token.value)
            .await
            .unwrap()
            .unwrap();

        assert!(tokens.access_token.value.starts_with("at-"));
        assert!(tokens.refresh_token.value.starts_with("rt-"));
        assert_eq!(session.subject, "jdoe");
        assert_eq!(session.active_portal_id(), Some(PortalId::new(1)));
        assert!(session.device.idp_session_info.is_some());
    }

    #[tokio::test]
    async fn refresh_with_wrong_token_requires_reauthentication() {
        let authority = InMemorySessionAuthority::new();
        let tokens = authority
            .create_session(new_session(identity(vec![Portal::new(1, "One", "https://p1")])))
            .await
            .unwrap();

        let result = authority
            .refresh_tokens_pair(&tokens.access_token.value, "rt-forged")
            .await;

        assert!(matches!(
            result,
            Err(UpstreamError::Structured { reauth_required: true, .. })
        ));
    }

    #[tokio::test]
    async fn refresh_invalidates_previous_access_token() {
        let authority = InMemorySessionAuthority::new();
        let tokens = authority
            .create_session(new_session(identity(vec![Portal::new(1, "One", "https://p1")])))
            .await
            .unwrap();

        let rotated = authority
            .refresh_tokens_pair(&tokens.access_token.value, &tokens.refresh_token.value)
            .await
            .unwrap();

        assert_eq!(authority.get_session(&tokens.access_token.value).await, Ok(None));
        let session = authority
            .get_session(&rotated.access_token.value)
            .await
            .unwrap()
            .unwrap();
        assert!(session.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn change_active_portal_updates_stored_session() {
        let authority = InMemorySessionAuthority::new();
        let tokens = authority
            .create_session(new_session(identity(vec![
                Portal::new(1, "One", "https://p1"),
                Portal::new(2, "Two", "https://p2"),
            ])))
            .await
            .unwrap();
        let session = authority
            .get_session(&tokens.access_token.value)
            .await
            .unwrap()
            .unwrap();

        let switch = authority
            .change_active_portal(PortalId::new(2), &session)
            .await
            .unwrap();

        assert_eq!(switch.portals.len(), 2);
        assert_eq!(switch.portal_session_id, "ps-2");
        let session = authority
            .get_session(&tokens.access_token.value)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.active_portal_id(), Some(PortalId::new(2)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Portal directory
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn filter_skips_unknown_ids() {
        let directory = InMemoryPortalDirectory::new()
            .with_portal(Portal::new(1, "One", "https://p1"))
            .with_portal(Portal::new(3, "Three", "https://p3"));

        let portals = directory
            .filter(&[PortalId::new(3), PortalId::new(2), PortalId::new(1)])
            .await
            .unwrap();

        let ids: Vec<_> = portals.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
