//! Portal module - tenant sites a user may operate within.

mod portal;
mod selection;

pub use portal::{mark_selected, ActivePortal, Portal};
pub use selection::{PortalSelection, PortalSelectionPolicy, PrimaryPortalSelection};
