//! Client device attached to a session.

use serde::{Deserialize, Serialize};

/// Identity-provider session handle bound to a device.
///
/// Required to end the IdP side of a session on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpSessionInfo {
    pub sid: String,
    pub client_id: String,
}

/// Browser/device the session was created from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub user_agent: String,
    pub user_login: String,
    /// SHA-256 of user agent and client IP, set when the session is created.
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub idp_session_info: Option<IdpSessionInfo>,
}

impl Device {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Default::default()
        }
    }

    pub fn with_login(mut self, user_login: impl Into<String>) -> Self {
        self.user_login = user_login.into();
        self
    }

    pub fn with_idp_session(mut self, sid: impl Into<String>, client_id: impl Into<String>) -> Self {
        self.idp_session_info = Some(IdpSessionInfo {
            sid: sid.into(),
            client_id: client_id.into(),
        });
        self
    }

    /// A device is usable only when it reports a user agent.
    pub fn is_usable(&self) -> bool {
        !self.user_agent.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_agent_is_not_usable() {
        assert!(!Device::new("").is_usable());
        assert!(!Device::new("  ").is_usable());
        assert!(Device::new("Mozilla/5.0").is_usable());
    }

    #[test]
    fn builder_attaches_idp_session() {
        let device = Device::new("Mozilla/5.0")
            .with_login("jdoe")
            .with_idp_session("sid-1", "portal-client");

        assert_eq!(device.user_login, "jdoe");
        let info = device.idp_session_info.unwrap();
        assert_eq!(info.sid, "sid-1");
        assert_eq!(info.client_id, "portal-client");
    }
}
