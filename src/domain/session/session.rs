//! Server-side session record.
//!
//! The session authority owns this record. The gateway only reads it and
//! asks the authority for transitions (create, refresh, portal change,
//! logout); it never builds or destroys one itself.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PortalId, SessionId, Timestamp, UserId};
use crate::domain::portal::ActivePortal;

use super::device::Device;

/// How the session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    #[default]
    Anon,
    PrimaryAuth,
    LegacyAuth,
    Service,
}

/// The person a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub portal_ids: Vec<PortalId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user: Option<User>,
    pub auth_type: AuthType,
    pub user_ip: String,
    pub device: Device,
    pub active_portal: Option<ActivePortal>,
    pub issuer: String,
    pub subject: String,
    pub last_active_at: Timestamp,
    pub access_expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
    pub created_at: Timestamp,
    pub refreshed_at: Option<Timestamp>,
    pub is_active: bool,
}

impl Session {
    /// Id of the portal currently active on this session, if any.
    pub fn active_portal_id(&self) -> Option<PortalId> {
        self.active_portal.as_ref().map(|active| active.portal.id)
    }

    pub fn is_access_expired(&self, now: &Timestamp) -> bool {
        now.is_after(&self.access_expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portal::Portal;

    fn session() -> Session {
        let now = Timestamp::now();
        Session {
            id: SessionId::new(),
            user: None,
            auth_type: AuthType::PrimaryAuth,
            user_ip: "10.0.0.1".to_string(),
            device: Device::new("Mozilla/5.0"),
            active_portal: None,
            issuer: "portal-bff".to_string(),
            subject: "jdoe".to_string(),
            last_active_at: now,
            access_expires_at: now.plus_secs(900),
            refresh_expires_at: now.plus_secs(3600),
            created_at: now,
            refreshed_at: None,
            is_active: true,
        }
    }

    #[test]
    fn active_portal_id_reads_from_active_portal() {
        let mut session = session();
        assert_eq!(session.active_portal_id(), None);

        session.active_portal = Some(ActivePortal::new(Portal::new(5, "Five", "https://p5"), "ps-5"));
        assert_eq!(session.active_portal_id(), Some(PortalId::new(5)));
    }

    #[test]
    fn access_expiry_compares_against_now() {
        let session = session();
        assert!(!session.is_access_expired(&Timestamp::now()));
        assert!(session.is_access_expired(&Timestamp::now().plus_secs(901)));
    }

    #[test]
    fn auth_type_serializes_snake_case() {
        let json = serde_json::to_string(&AuthType::PrimaryAuth).unwrap();
        assert_eq!(json, "\"primary_auth\"");
    }
}
