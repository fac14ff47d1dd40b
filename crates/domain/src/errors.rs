//! Error types used throughout the Horizon client

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::{Feature, HashAlgorithm};

/// Main error type for the Horizon client.
///
/// Every public call returns either a value or exactly one of these. Nothing
/// is retried internally; [`HorizonError::is_retryable`] tells the caller
/// which failures are worth repeating.
#[derive(Error, Debug)]
pub enum HorizonError {
    /// DNS, connect, timeout or write failure in the underlying transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JWT mode was active but the probe response carried no `Replay-Nonce`.
    #[error("could not get nonce for JWT: missing Replay-Nonce header")]
    MissingNonce,

    /// Minting the PoP token failed.
    #[error("could not compute JWT: {0}")]
    Signing(#[from] SigningError),

    /// The service explicitly reported a failure.
    #[error("{error} (HTTP {status})")]
    Server { status: u16, error: ServerError },

    /// A body could not be decoded; the raw text is always kept.
    #[error("{reason}: {body}")]
    Decode { reason: String, body: String },

    /// A server-version gate, signalled by content type rather than status.
    #[error("{feature} is not available on this Horizon instance (requires version {implemented_in} or later)")]
    Unimplemented { feature: Feature, implemented_in: &'static str },

    /// Invalid settings or credential material.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HorizonError {
    /// Whether repeating the whole operation could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::MissingNonce)
    }

    /// The server-declared error records, if the server reported any.
    #[must_use]
    pub fn server_records(&self) -> &[ErrorRecord] {
        match self {
            Self::Server { error, .. } => error.records(),
            _ => &[],
        }
    }
}

/// Failures while minting a proof-of-possession token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The signer cannot sign with this hash.
    #[error("hash {0} not available")]
    HashUnavailable(HashAlgorithm),

    /// An ECDSA signer returned something other than DER `r`/`s`.
    #[error("invalid ASN.1 signature: {0}")]
    InvalidSignatureEncoding(String),

    /// No PoP algorithm exists for this key.
    #[error("unsupported public key type: {0}")]
    UnsupportedKeyType(String),

    /// The certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The signing capability itself refused or failed.
    #[error("signer failed: {0}")]
    Signer(String),
}

/// One error entry as returned by the service.
///
/// Every field is optional on the wire; a missing or `null` field decodes
/// as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Machine-readable code such as `SEC-AUTH-001`.
    #[serde(rename = "error", default, deserialize_with = "null_as_empty")]
    pub code: String,
    /// Human-readable summary.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    /// Extra context; often empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub detail: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ErrorRecord {
    /// Build a record from its three parts.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self { code: code.into(), message: message.into(), detail: detail.into() }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Horizon returned a {} error: {}", self.code, self.message)?;
        if !self.detail.is_empty() {
            write!(f, " ({})", self.detail)?;
        }
        Ok(())
    }
}

/// Error payload declared by the server: one record or an ordered list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// One error object.
    #[error("{0}")]
    Single(ErrorRecord),

    /// A JSON array of error objects.
    #[error("{}", join_records(.0))]
    Multiple(Vec<ErrorRecord>),
}

impl ServerError {
    /// Records in the order the server sent them.
    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Multiple(records) => records,
        }
    }

    /// Returns true if any record carries `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.records().iter().any(|record| record.code == code)
    }
}

fn join_records(records: &[ErrorRecord]) -> String {
    if records.is_empty() {
        return "Horizon returned an empty error list".to_string();
    }
    records.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Result type alias for Horizon client operations
pub type Result<T> = std::result::Result<T, HorizonError>;
