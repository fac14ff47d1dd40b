//! Software implementations of the signing capability
//!
//! Production callers usually sign with an HSM or a smart card. These
//! signers hold the key in memory and exist to exercise the token code and
//! verify its output.

use horizon_domain::{HashAlgorithm, KeySigner, SigningError};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

fn signer_error(err: impl std::fmt::Display) -> SigningError {
    SigningError::Signer(err.to_string())
}

fn key_error(err: impl std::fmt::Display) -> SigningError {
    SigningError::Signer(format!("cannot load private key: {err}"))
}

/// RSA key producing PKCS#1 v1.5 signatures.
pub struct RsaPkcs1Signer {
    key: RsaPrivateKey,
}

impl RsaPkcs1Signer {
    /// Load an unencrypted PKCS#8 key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, SigningError> {
        RsaPrivateKey::from_pkcs8_pem(pem).map(|key| Self { key }).map_err(key_error)
    }
}

impl KeySigner for RsaPkcs1Signer {
    fn sign(&self, digest: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>, SigningError> {
        let padding = match hash {
            HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
            HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        };
        self.key.sign(padding, digest).map_err(signer_error)
    }
}

/// P-256 key returning DER-encoded signatures.
pub struct EcdsaP256Signer {
    key: p256::ecdsa::SigningKey,
}

impl EcdsaP256Signer {
    /// Load an unencrypted PKCS#8 P-256 key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, SigningError> {
        p256::ecdsa::SigningKey::from_pkcs8_pem(pem).map(|key| Self { key }).map_err(key_error)
    }
}

impl KeySigner for EcdsaP256Signer {
    fn sign(&self, digest: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>, SigningError> {
        if !self.supports_hash(hash) {
            return Err(SigningError::HashUnavailable(hash));
        }
        let signature: p256::ecdsa::Signature =
            self.key.sign_prehash(digest).map_err(signer_error)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn supports_hash(&self, hash: HashAlgorithm) -> bool {
        hash == HashAlgorithm::Sha256
    }
}

/// P-384 key returning DER-encoded signatures.
pub struct EcdsaP384Signer {
    key: p384::ecdsa::SigningKey,
}

impl EcdsaP384Signer {
    /// Load an unencrypted PKCS#8 P-384 key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self, SigningError> {
        p384::ecdsa::SigningKey::from_pkcs8_pem(pem).map(|key| Self { key }).map_err(key_error)
    }
}

impl KeySigner for EcdsaP384Signer {
    fn sign(&self, digest: &[u8], hash: HashAlgorithm) -> Result<Vec<u8>, SigningError> {
        if !self.supports_hash(hash) {
            return Err(SigningError::HashUnavailable(hash));
        }
        let signature: p384::ecdsa::Signature =
            self.key.sign_prehash(digest).map_err(signer_error)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn supports_hash(&self, hash: HashAlgorithm) -> bool {
        hash == HashAlgorithm::Sha384
    }
}

/// Verify an RS256 signature over `message` with the key's public half.
pub fn verify_rsa_pkcs1(private_key_pem: &str, message: &[u8], signature: &[u8]) -> bool {
    let Ok(key) = RsaPrivateKey::from_pkcs8_pem(private_key_pem) else {
        return false;
    };
    let digest = Sha256::digest(message);
    key.to_public_key().verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature).is_ok()
}

/// Verify an ES256 `r || s` signature over `message`.
pub fn verify_p256_fixed(private_key_pem: &str, message: &[u8], signature: &[u8]) -> bool {
    let (Ok(key), Ok(signature)) = (
        p256::ecdsa::SigningKey::from_pkcs8_pem(private_key_pem),
        p256::ecdsa::Signature::from_slice(signature),
    ) else {
        return false;
    };
    key.verifying_key().verify_prehash(&Sha256::digest(message), &signature).is_ok()
}

/// Verify an ES384 `r || s` signature over `message`.
pub fn verify_p384_fixed(private_key_pem: &str, message: &[u8], signature: &[u8]) -> bool {
    let (Ok(key), Ok(signature)) = (
        p384::ecdsa::SigningKey::from_pkcs8_pem(private_key_pem),
        p384::ecdsa::Signature::from_slice(signature),
    ) else {
        return false;
    };
    key.verifying_key().verify_prehash(&Sha384::digest(message), &signature).is_ok()
}

/// Split a DER P-256 signature into big-endian `(r, s)` of 32 bytes each.
pub fn ecdsa_p256_components(der: &[u8]) -> (Vec<u8>, Vec<u8>) {
    match p256::ecdsa::Signature::from_der(der) {
        Ok(signature) => {
            let (r, s) = signature.split_bytes();
            (r.to_vec(), s.to_vec())
        }
        Err(_) => (Vec::new(), Vec::new()),
    }
}

/// Split a DER P-384 signature into big-endian `(r, s)` of 48 bytes each.
pub fn ecdsa_p384_components(der: &[u8]) -> (Vec<u8>, Vec<u8>) {
    match p384::ecdsa::Signature::from_der(der) {
        Ok(signature) => {
            let (r, s) = signature.split_bytes();
            (r.to_vec(), s.to_vec())
        }
        Err(_) => (Vec::new(), Vec::new()),
    }
}
