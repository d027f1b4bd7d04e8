//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::application::CoordinatorSettings;
use crate::domain::auth::AccessAllowlist;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (login flow and token lifetimes)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Base URL login callbacks are resolved against
    #[serde(default)]
    pub callback_base_url: String,

    /// Issuer name stamped on sessions
    #[serde(default)]
    pub app_name: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl_secs: u64,

    /// Emails allowed to log in (comma-separated); empty disables the gate
    pub access_allowlist: Option<String>,

    /// Path on the origin portal that accepts handoff redirects
    #[serde(default = "default_auth_link_path")]
    pub auth_link_path: String,
}

impl AuthConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    pub fn allowlist(&self) -> AccessAllowlist {
        AccessAllowlist::new(
            self.access_allowlist
                .as_deref()
                .unwrap_or_default()
                .split(','),
        )
    }

    pub fn callback_base(&self) -> Result<Url, ValidationError> {
        Url::parse(&self.callback_base_url)
            .map_err(|e| ValidationError::InvalidCallbackUrl(e.to_string()))
    }

    /// Converts into the settings the coordinator is constructed with.
    pub fn coordinator_settings(&self) -> Result<CoordinatorSettings, ValidationError> {
        Ok(CoordinatorSettings::new(self.callback_base()?, self.app_name.clone())
            .with_ttls(self.access_token_ttl(), self.refresh_token_ttl())
            .with_allowlist(self.allowlist()))
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the callback base URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.callback_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("CALLBACK_BASE_URL"));
        }
        if self.app_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("APP_NAME"));
        }

        let base = self.callback_base()?;
        if base.cannot_be_a_base() {
            return Err(ValidationError::InvalidCallbackUrl(
                "not a base URL".to_string(),
            ));
        }
        if *environment == Environment::Production && base.scheme() != "https" {
            return Err(ValidationError::CallbackMustBeHttps);
        }

        if self.access_token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.refresh_token_ttl_secs <= self.access_token_ttl_secs {
            return Err(ValidationError::RefreshTtlTooShort);
        }
        if !self.auth_link_path.starts_with('/') {
            return Err(ValidationError::InvalidAuthLinkPath);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            callback_base_url: String::new(),
            app_name: String::new(),
            access_token_ttl_secs: default_access_token_ttl(),
            refresh_token_ttl_secs: default_refresh_token_ttl(),
            access_allowlist: None,
            auth_link_path: default_auth_link_path(),
        }
    }
}

fn default_access_token_ttl() -> u64 {
    900
}

fn default_refresh_token_ttl() -> u64 {
    2_592_000
}

fn default_auth_link_path() -> String {
    "/auth/redirect".to_string()
}
