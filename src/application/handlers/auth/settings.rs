//! Immutable coordinator settings.

use std::time::Duration;

use url::Url;

use crate::domain::auth::AccessAllowlist;
use crate::domain::portal::PrimaryPortalSelection;

/// Configuration fixed at construction time and only read afterwards.
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Base URL every login callback is resolved against.
    pub callback_base: Url,
    /// Issuer name stamped on sessions minted for this gateway.
    pub app_name: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub allowlist: AccessAllowlist,
    pub primary_portal: PrimaryPortalSelection,
}

impl CoordinatorSettings {
    pub fn new(callback_base: Url, app_name: impl Into<String>) -> Self {
        Self {
            callback_base,
            app_name: app_name.into(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(30 * 24 * 60 * 60),
            allowlist: AccessAllowlist::default(),
            primary_portal: PrimaryPortalSelection::default(),
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_allowlist(mut self, allowlist: AccessAllowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Resolves a caller-supplied callback against the configured base.
    ///
    /// Relative paths are joined onto the base. An empty input, an input that
    /// fails to parse, or one that points at a different origin yields the
    /// bare base URL.
    pub fn normalize_callback(&self, callback_uri: &str) -> Url {
        let callback_uri = callback_uri.trim();
        if callback_uri.is_empty() {
            return self.callback_base.clone();
        }

        match self.callback_base.join(callback_uri) {
            Ok(url) if url.origin() == self.callback_base.origin() => url,
            Ok(url) => {
                tracing::debug!(callback = %url, "callback points at a foreign origin, using base");
                self.callback_base.clone()
            }
            Err(e) => {
                tracing::debug!(error = %e, "invalid callback uri, using base");
                self.callback_base.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CoordinatorSettings {
        CoordinatorSettings::new(
            Url::parse("https://portal.example.com/auth/callback").unwrap(),
            "portal-bff",
        )
    }

    #[test]
    fn defaults_are_fifteen_minutes_and_thirty_days() {
        let settings = settings();
        assert_eq!(settings.access_ttl, Duration::from_secs(900));
        assert_eq!(settings.refresh_ttl, Duration::from_secs(2_592_000));
        assert!(!settings.allowlist.is_enabled());
        assert_eq!(settings.primary_portal, PrimaryPortalSelection::FirstInList);
    }

    #[test]
    fn empty_callback_yields_base() {
        assert_eq!(
            settings().normalize_callback("").as_str(),
            "https://portal.example.com/auth/callback"
        );
    }

    #[test]
    fn relative_callback_is_joined_onto_base() {
        assert_eq!(
            settings().normalize_callback("/news?id=4").as_str(),
            "https://portal.example.com/news?id=4"
        );
    }

    #[test]
    fn same_origin_absolute_callback_is_kept() {
        assert_eq!(
            settings()
                .normalize_callback("https://portal.example.com/surveys")
                .as_str(),
            "https://portal.example.com/surveys"
        );
    }

    #[test]
    fn foreign_origin_degrades_to_base() {
        assert_eq!(
            settings().normalize_callback("https://evil.example.net/steal").as_str(),
            "https://portal.example.com/auth/callback"
        );
    }

    #[test]
    fn unparseable_callback_degrades_to_base() {
        assert_eq!(
            settings().normalize_callback("http://[::1").as_str(),
            "https://portal.example.com/auth/callback"
        );
    }
}
