//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PORTAL_BFF` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use portal_bff::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod error;
mod server;

pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Login flow configuration (callback base, token lifetimes, allowlist)
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PORTAL_BFF` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PORTAL_BFF__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PORTAL_BFF__AUTH__CALLBACK_BASE_URL=...` -> `auth.callback_base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PORTAL_BFF")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var(
            "PORTAL_BFF__AUTH__CALLBACK_BASE_URL",
            "https://portal.example.com/auth/callback",
        );
        env::set_var("PORTAL_BFF__AUTH__APP_NAME", "portal-bff");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("PORTAL_BFF__AUTH__CALLBACK_BASE_URL");
        env::remove_var("PORTAL_BFF__AUTH__APP_NAME");
        env::remove_var("PORTAL_BFF__AUTH__ACCESS_TOKEN_TTL_SECS");
        env::remove_var("PORTAL_BFF__AUTH__ACCESS_ALLOWLIST");
        env::remove_var("PORTAL_BFF__SERVER__PORT");
        env::remove_var("PORTAL_BFF__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(
            config.auth.callback_base_url,
            "https://portal.example.com/auth/callback"
        );
        assert_eq!(config.auth.app_name, "portal-bff");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PORTAL_BFF__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PORTAL_BFF__SERVER__PORT", "3000");
        env::set_var("PORTAL_BFF__AUTH__ACCESS_TOKEN_TTL_SECS", "300");
        env::set_var("PORTAL_BFF__AUTH__ACCESS_ALLOWLIST", "a@corp.example,b@corp.example");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_token_ttl_secs, 300);
        assert_eq!(config.auth.allowlist().len(), 2);
    }
}
