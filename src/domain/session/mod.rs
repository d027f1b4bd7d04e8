//! Session module - the authoritative session record and its parts.

mod device;
mod handoff;
mod session;
mod tokens;

pub use device::{Device, IdpSessionInfo};
pub use handoff::HandoffPayload;
pub use session::{AuthType, Session, User};
pub use tokens::{Token, TokensPair};
