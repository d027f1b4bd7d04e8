//! Device and client-IP binding for new sessions.
//!
//! The transport layer describes each request with a [`RequestContext`] and
//! passes it explicitly to the coordinator. A session is only ever bound to a
//! real device: a missing device and a device without a user agent are the
//! same hard failure. The client IP is best effort and passed through as
//! found, even when empty.

use sha2::{Digest, Sha256};

use crate::domain::session::Device;

use super::errors::AuthError;

/// Per-request facts supplied by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub device: Option<Device>,
    pub client_ip: Option<String>,
}

impl RequestContext {
    pub fn new(device: Option<Device>, client_ip: Option<String>) -> Self {
        Self { device, client_ip }
    }
}

/// A usable device plus the client IP it was seen from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBinding {
    pub device: Device,
    pub client_ip: String,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceBindingExtractor;

impl DeviceBindingExtractor {
    pub fn extract(ctx: &RequestContext) -> Result<DeviceBinding, AuthError> {
        let device = match &ctx.device {
            Some(device) if device.is_usable() => device.clone(),
            Some(_) => {
                tracing::debug!("request device has an empty user agent");
                return Err(AuthError::InvalidDevice);
            }
            None => {
                tracing::debug!("no device attached to request");
                return Err(AuthError::InvalidDevice);
            }
        };

        let client_ip = ctx.client_ip.clone().unwrap_or_default();
        let fingerprint = fingerprint(&device.user_agent, &client_ip);

        Ok(DeviceBinding {
            device,
            client_ip,
            fingerprint,
        })
    }
}

/// SHA-256 hex digest of the user agent and client IP.
pub fn fingerprint(user_agent: &str, client_ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(b"\n");
    hasher.update(client_ip.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_invalid() {
        let ctx = RequestContext::new(None, Some("10.0.0.1".to_string()));
        assert_eq!(DeviceBindingExtractor::extract(&ctx), Err(AuthError::InvalidDevice));
    }

    #[test]
    fn empty_user_agent_is_invalid() {
        let ctx = RequestContext::new(Some(Device::new("")), Some("10.0.0.1".to_string()));
        assert_eq!(DeviceBindingExtractor::extract(&ctx), Err(AuthError::InvalidDevice));
    }

    #[test]
    fn missing_ip_does_not_fail_binding() {
        let ctx = RequestContext::new(Some(Device::new("Mozilla/5.0")), None);
        let binding = DeviceBindingExtractor::extract(&ctx).unwrap();

        assert_eq!(binding.client_ip, "");
        assert_eq!(binding.device.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn unparseable_ip_is_passed_through() {
        let ctx = RequestContext::new(Some(Device::new("Mozilla/5.0")), Some("unknown".to_string()));
        let binding = DeviceBindingExtractor::extract(&ctx).unwrap();
        assert_eq!(binding.client_ip, "unknown");
    }

    #[test]
    fn fingerprint_is_stable_and_ip_sensitive() {
        let a = fingerprint("Mozilla/5.0", "10.0.0.1");
        let b = fingerprint("Mozilla/5.0", "10.0.0.1");
        let c = fingerprint("Mozilla/5.0", "10.0.0.2");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
