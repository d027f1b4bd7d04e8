//! Identity module - who the identity provider says the caller is.
//!
//! An [`IdentityRecord`] lives only for the duration of one login. It is
//! never persisted by the gateway; the session authority derives the
//! session's [`User`] from it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PortalId;
use crate::domain::portal::Portal;
use crate::domain::session::User;

/// Link between the identity and an employee record on one portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLink {
    pub employee_id: String,
    pub portal_id: PortalId,
}

/// Verified identity returned by the identity provider after a code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub user: Option<User>,
    #[serde(default)]
    pub portals: Vec<Portal>,
    #[serde(default)]
    pub employees: Vec<EmployeeLink>,
}

impl IdentityRecord {
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.email.as_str())
    }

    pub fn login(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.login.as_str())
    }
}

/// Result of authenticating the identity against a single portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalAuth {
    pub portal: Portal,
    pub portal_session_id: String,
    pub employee_id: String,
    pub person_id: String,
}
