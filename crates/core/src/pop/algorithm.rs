//! Signature algorithm selection for PoP tokens

use horizon_domain::{HashAlgorithm, SigningError};
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::der::der_to_fixed_width;
use crate::certificate::{Certificate, KeyType, NamedCurve};

/// The closed set of JWS algorithms the PoP protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    Rs256,
    /// ECDSA P-256 with SHA-256.
    Es256,
    /// ECDSA P-384 with SHA-384.
    Es384,
    /// ECDSA P-521 with SHA-512.
    Es512,
}

impl KeyAlgorithm {
    /// Pick the algorithm matching the certificate's public key.
    pub fn for_certificate(certificate: &Certificate) -> Result<Self, SigningError> {
        match certificate.key_type()? {
            KeyType::Rsa => Ok(Self::Rs256),
            KeyType::EllipticCurve(NamedCurve::P256) => Ok(Self::Es256),
            KeyType::EllipticCurve(NamedCurve::P384) => Ok(Self::Es384),
            KeyType::EllipticCurve(NamedCurve::P521) => Ok(Self::Es512),
            KeyType::EllipticCurve(NamedCurve::Unknown(oid)) => {
                Err(SigningError::UnsupportedKeyType(format!("elliptic curve {oid}")))
            }
            KeyType::Other(oid) => Err(SigningError::UnsupportedKeyType(oid)),
        }
    }

    /// JWS `alg` header value.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
        }
    }

    /// Hash the signer is asked to sign with.
    #[must_use]
    pub fn hash(self) -> HashAlgorithm {
        match self {
            Self::Rs256 | Self::Es256 => HashAlgorithm::Sha256,
            Self::Es384 => HashAlgorithm::Sha384,
            Self::Es512 => HashAlgorithm::Sha512,
        }
    }

    /// Curve size in bits, `None` for RSA.
    #[must_use]
    pub fn curve_bits(self) -> Option<usize> {
        match self {
            Self::Rs256 => None,
            Self::Es256 => Some(256),
            Self::Es384 => Some(384),
            Self::Es512 => Some(521),
        }
    }

    /// Width of each of `r` and `s` in the fixed-width encoding.
    #[must_use]
    pub fn coordinate_len(self) -> Option<usize> {
        self.curve_bits().map(|bits| bits.div_ceil(8))
    }

    /// Hash `input` with [`KeyAlgorithm::hash`].
    #[must_use]
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self.hash() {
            HashAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(input).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
        }
    }

    /// Turn the signer's output into the bytes the token carries.
    ///
    /// RSA signatures pass through; ECDSA ones are converted from DER.
    pub fn encode_signature(self, signature: Vec<u8>) -> Result<Vec<u8>, SigningError> {
        match self.coordinate_len() {
            None => Ok(signature),
            Some(len) => der_to_fixed_width(&signature, len),
        }
    }
}
