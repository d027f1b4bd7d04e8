//! Access allowlist.
//!
//! Business policy gate applied after a successful identity-provider login.
//! An empty list disables the gate entirely.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessAllowlist {
    emails: HashSet<String>,
}

impl AccessAllowlist {
    /// Builds an allowlist from email addresses. Matching is case-insensitive
    /// and ignores surrounding whitespace; blank entries are dropped.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|email| normalize(email.as_ref()))
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    pub fn is_enabled(&self) -> bool {
        !self.emails.is_empty()
    }

    /// Whether an identity with `email` may log in.
    pub fn permits(&self, email: Option<&str>) -> bool {
        if !self.is_enabled() {
            return true;
        }
        email
            .map(|email| self.emails.contains(&normalize(email)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
