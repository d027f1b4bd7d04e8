//! Portal value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PortalId;

/// A tenant site the authenticated user may operate within.
///
/// `is_selected` is call-scoped: it marks the portal that is active on the
/// session a response was built for and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub id: PortalId,
    pub name: String,
    pub url: String,
    pub logo_image: String,
    #[serde(default)]
    pub is_selected: bool,
}

impl Portal {
    pub fn new(id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: PortalId::new(id),
            name: name.into(),
            url: url.into(),
            logo_image: String::new(),
            is_selected: false,
        }
    }

    pub fn with_logo(mut self, logo_image: impl Into<String>) -> Self {
        self.logo_image = logo_image.into();
        self
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// The portal currently in use on a session, paired with the portal
/// authority's own session handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePortal {
    pub portal: Portal,
    pub portal_session_id: String,
}

impl ActivePortal {
    pub fn new(portal: Portal, portal_session_id: impl Into<String>) -> Self {
        Self {
            portal,
            portal_session_id: portal_session_id.into(),
        }
    }
}

/// Returns `portals` with only the entry matching `active` flagged as selected.
pub fn mark_selected(portals: Vec<Portal>, active: Option<PortalId>) -> Vec<Portal> {
    portals
        .into_iter()
        .map(|mut portal| {
            portal.is_selected = Some(portal.id) == active;
            portal
        })
        .collect()
}
