//! Access/refresh token values.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// An opaque token issued by the session authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl Token {
    pub fn new(value: impl Into<String>, expires_at: Option<Timestamp>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Access and refresh token issued together.
///
/// Returned to the caller and never retained by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensPair {
    pub access_token: Token,
    pub refresh_token: Token,
}

impl TokensPair {
    pub fn new(access_token: Token, refresh_token: Token) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}
