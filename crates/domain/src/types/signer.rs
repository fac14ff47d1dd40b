//! Abstract signing capability
//!
//! The client never holds raw private key material for JWT authentication.
//! It only needs something able to sign a digest, which lets callers plug in
//! hardware tokens, HSMs or cloud KMS keys.

use crate::errors::SigningError;
use crate::impl_domain_enum_conversions;

/// Hash functions used by the supported signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl_domain_enum_conversions!(HashAlgorithm {
    Sha256 => "sha256",
    Sha384 => "sha384",
    Sha512 => "sha512",
});

/// A private key that can sign a precomputed digest.
///
/// RSA keys must produce a PKCS#1 v1.5 signature. Elliptic-curve keys return
/// the ASN.1 DER `SEQUENCE { r INTEGER, s INTEGER }` form.
pub trait KeySigner: Send + Sync {
    /// Sign `digest`, which was produced with `hash`.
    fn sign(&self, digest: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>, SigningError>;

    /// Whether this signer can work with `hash` at all.
    fn supports_hash(&self, _hash: HashAlgorithm) -> bool {
        true
    }
}
