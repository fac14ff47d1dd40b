//! Server-issued anti-replay nonce

use std::fmt;

/// Single-use value taken from a `Replay-Nonce` response header.
///
/// Deliberately not `Clone`: signing consumes it, so one nonce backs at most
/// one token.
#[derive(PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Accept a header value; empty values do not count as a nonce.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// The nonce value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Give up the nonce for embedding in a token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Nonce").field(&self.0).finish()
    }
}
