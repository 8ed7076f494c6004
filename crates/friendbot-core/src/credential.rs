//! Caller-supplied credential for the completion endpoint.

use std::fmt;

/// Opaque secret forwarded verbatim as a bearer token.
///
/// The core never generates, stores or mutates a credential. An empty string
/// is not a credential; use [`Credential::parse`] to turn raw caller input
/// into `Option<Credential>`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap raw input, treating empty or whitespace-only input as absent.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Convenience for optional caller input (flag, env var, settings field).
    pub fn from_option(raw: Option<String>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// Whether the credential has the shape the endpoint expects.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// The secret itself. Only the transport should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A form safe to print or log.
    pub fn masked(&self) -> String {
        let visible: String = self.0.chars().take(8).collect();
        format!("{}…", visible)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}
