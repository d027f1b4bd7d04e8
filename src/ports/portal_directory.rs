//! Portal directory port.
//!
//! Resolves portal ids to the display records shown when listing a user's
//! memberships.

use async_trait::async_trait;

use crate::domain::auth::UpstreamError;
use crate::domain::foundation::PortalId;
use crate::domain::portal::Portal;

/// Read-only lookup of portal display data.
///
/// # Contract
///
/// - Unknown ids are skipped, not reported as errors
/// - Order of the result is unspecified
#[async_trait]
pub trait PortalDirectory: Send + Sync {
    async fn filter(&self, ids: &[PortalId]) -> Result<Vec<Portal>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_directory_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn PortalDirectory) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn PortalDirectory>>();
    }
}
