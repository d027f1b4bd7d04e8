//! Request device and client IP extraction.
//!
//! Builds the [`RequestContext`] the coordinator binds sessions to. The
//! device is taken from `User-Agent`, the client IP from the first `X-Forwarded-For` hop or `X-Real-IP`.
//!
//! A request without a `User-Agent` header yields a context with no device;
//! rejecting it is the coordinator's decision, not this extractor's. The
//! device's login is never read from the request; the coordinator sets it
//! from the verified identity.

use axum::http::{header, HeaderMap};

use crate::domain::auth::RequestContext;
use crate::domain::session::Device;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

fn header_str<'a>(headers: &'a HeaderMap, name: impl header::AsHeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Builds the device/IP context from request headers.
pub fn request_context_from_headers(headers: &HeaderMap) -> RequestContext {
    let device = header_str(headers, header::USER_AGENT).map(Device::new);

    let client_ip = header_str(headers, X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, X_REAL_IP))
        .map(str::to_string);

    RequestContext::new(device, client_ip)
}

/// Extractor for the request's device/IP context. Never rejects.
#[derive(Debug, Clone)]
pub struct ClientContext(pub RequestContext);

impl<S> axum::extract::FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { Ok(ClientContext(request_context_from_headers(&parts.headers))) })
    }
}
