//! Portal selection rules.
//!
//! Pure decision logic with no I/O. Given the portal a user asked for and the
//! authoritative list of portals for their session, the policy decides
//! whether that portal can become active.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the list is empty → [`PortalSelection::NoPortals`]
//! 2. the candidate is not in the list → [`PortalSelection::Unavailable`]
//! 3. the candidate has no URL → [`PortalSelection::EmptyUrl`]

use crate::domain::auth::AuthError;
use crate::domain::foundation::PortalId;

use super::portal::{mark_selected, Portal};

/// Outcome of selecting a portal from a session's portal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalSelection {
    /// The candidate is usable. `portals` is the full list with only the
    /// candidate flagged as selected.
    Selected { portal: Portal, portals: Vec<Portal> },
    /// The candidate is not among the user's portals.
    Unavailable(PortalId),
    /// The user has no portals at all.
    NoPortals,
    /// The candidate exists but has no URL to send the user to.
    EmptyUrl(PortalId),
}

impl PortalSelection {
    /// Converts the outcome into the coordinator's error vocabulary.
    pub fn into_result(self) -> Result<(Portal, Vec<Portal>), AuthError> {
        match self {
            PortalSelection::Selected { portal, portals } => Ok((portal, portals)),
            PortalSelection::Unavailable(id) => Err(AuthError::UnavailablePortal(id)),
            PortalSelection::NoPortals => Err(AuthError::PortalsNotFound),
            PortalSelection::EmptyUrl(id) => Err(AuthError::EmptyPortalUrl(id)),
        }
    }
}

/// Decides which portal becomes active on a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortalSelectionPolicy;

impl PortalSelectionPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn select(&self, candidate: PortalId, portals: Vec<Portal>) -> PortalSelection {
        if portals.is_empty() {
            return PortalSelection::NoPortals;
        }

        let Some(found) = portals.iter().find(|p| p.id == candidate) else {
            return PortalSelection::Unavailable(candidate);
        };

        if !found.has_url() {
            return PortalSelection::EmptyUrl(candidate);
        }

        let mut portal = found.clone();
        portal.is_selected = true;

        PortalSelection::Selected {
            portal,
            portals: mark_selected(portals, Some(candidate)),
        }
    }
}

/// Which membership a fresh login authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimaryPortalSelection {
    /// Always the first portal the identity provider lists.
    // TODO: pick the primary employer's portal once the directory exposes it.
    #[default]
    FirstInList,
}

impl PrimaryPortalSelection {
    pub fn pick<'a>(&self, portals: &'a [Portal]) -> Option<&'a Portal> {
        match self {
            PrimaryPortalSelection::FirstInList => portals.first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn portal(id: i64, url: &str) -> Portal {
        Portal::new(id, format!("Portal {}", id), url)
    }

    #[test]
    fn empty_list_yields_no_portals() {
        let outcome = PortalSelectionPolicy::new().select(PortalId::new(1), vec![]);
        assert_eq!(outcome, PortalSelection::NoPortals);
    }

    #[test]
    fn missing_candidate_yields_unavailable() {
        let outcome = PortalSelectionPolicy::new().select(PortalId::new(2), vec![portal(1, "u")]);
        assert_eq!(outcome, PortalSelection::Unavailable(PortalId::new(2)));
    }

    #[test]
    fn candidate_without_url_yields_empty_url() {
        let outcome = PortalSelectionPolicy::new()
            .select(PortalId::new(1), vec![portal(1, ""), portal(2, "https://p2")]);
        assert_eq!(outcome, PortalSelection::EmptyUrl(PortalId::new(1)));
    }

    #[test]
    fn missing_candidate_wins_over_blank_urls_elsewhere() {
        let outcome = PortalSelectionPolicy::new().select(PortalId::new(3), vec![portal(1, "")]);
        assert_eq!(outcome, PortalSelection::Unavailable(PortalId::new(3)));
    }

    #[test]
    fn selected_portal_is_flagged_in_list() {
        let outcome = PortalSelectionPolicy::new().select(
            PortalId::new(2),
            vec![portal(1, "https://p1"), portal(2, "https://p2")],
        );

        match outcome {
            PortalSelection::Selected { portal, portals } => {
                assert_eq!(portal.id, PortalId::new(2));
                assert!(portal.is_selected);
                assert!(!portals[0].is_selected);
                assert!(portals[1].is_selected);
            }
            other => panic!("Expected Selected, got {:?}", other),
        }
    }

    #[test]
    fn into_result_maps_outcomes_to_errors() {
        assert!(matches!(
            PortalSelection::NoPortals.into_result(),
            Err(AuthError::PortalsNotFound)
        ));
        assert!(matches!(
            PortalSelection::Unavailable(PortalId::new(9)).into_result(),
            Err(AuthError::UnavailablePortal(id)) if id == PortalId::new(9)
        ));
        assert!(matches!(
            PortalSelection::EmptyUrl(PortalId::new(4)).into_result(),
            Err(AuthError::EmptyPortalUrl(id)) if id == PortalId::new(4)
        ));
    }

    #[test]
    fn first_in_list_picks_first_portal() {
        let portals = vec![portal(7, "https://p7"), portal(3, "https://p3")];
        let picked = PrimaryPortalSelection::FirstInList.pick(&portals).unwrap();
        assert_eq!(picked.id, PortalId::new(7));
        assert!(PrimaryPortalSelection::FirstInList.pick(&[]).is_none());
    }

    fn arb_portals() -> impl Strategy<Value = Vec<Portal>> {
        prop::collection::vec((0i64..20, prop::bool::ANY), 0..8).prop_map(|entries| {
            let mut seen = std::collections::HashSet::new();
            entries
                .into_iter()
                .filter(|(id, _)| seen.insert(*id))
                .map(|(id, has_url)| {
                    portal(id, if has_url { "https://portal.example" } else { "" })
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn selection_is_exactly_one_outcome(candidate in 0i64..20, portals in arb_portals()) {
            let candidate = PortalId::new(candidate);
            let found = portals.iter().find(|p| p.id == candidate).cloned();
            let outcome = PortalSelectionPolicy::new().select(candidate, portals.clone());

            match outcome {
                PortalSelection::NoPortals => prop_assert!(portals.is_empty()),
                PortalSelection::Unavailable(id) => {
                    prop_assert!(!portals.is_empty());
                    prop_assert_eq!(id, candidate);
                    prop_assert!(found.is_none());
                }
                PortalSelection::EmptyUrl(id) => {
                    prop_assert_eq!(id, candidate);
                    prop_assert!(found.map(|p| p.url.is_empty()).unwrap_or(false));
                }
                PortalSelection::Selected { portal, portals: marked } => {
                    prop_assert_eq!(portal.id, candidate);
                    prop_assert!(portal.has_url());
                    prop_assert_eq!(marked.len(), portals.len());
                    let selected: Vec<_> = marked.iter().filter(|p| p.is_selected).collect();
                    prop_assert_eq!(selected.len(), 1);
                    prop_assert_eq!(selected[0].id, candidate);
                }
            }
        }
    }
}
