//! Authentication policy - errors, upstream failure classification,
//! device binding and the access allowlist.
//!
//! Everything here is pure and I/O free; the coordinator in
//! `application::handlers::auth` wires it to the collaborator ports.

mod allowlist;
mod classifier;
mod device_binding;
mod errors;
mod masking;
mod upstream;

pub use allowlist::AccessAllowlist;
pub use classifier::{
    Classification, Disposition, ErrorClassifier, LogSeverity, Operation,
    LOG_CODE_PORTALS_NOT_FOUND,
};
pub use device_binding::{fingerprint, DeviceBinding, DeviceBindingExtractor, RequestContext};
pub use errors::AuthError;
pub use masking::mask_token;
pub use upstream::{UpstreamError, NO_PORTALS_CODE};
