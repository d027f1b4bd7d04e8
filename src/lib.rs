//! Portal BFF - login and session lifecycle for a multi-portal gateway.
//!
//! This crate sequences the identity provider, the session authority and the
//! portal directory into one login/session flow, and exposes it over HTTP.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
