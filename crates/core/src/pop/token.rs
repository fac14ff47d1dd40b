//! PoP token claims and compact serialization

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use horizon_domain::constants::POP_TOKEN_LIFETIME_SECS;
use horizon_domain::{KeySigner, SigningError};
use serde::{Deserialize, Serialize};

use super::algorithm::KeyAlgorithm;
use super::nonce::Nonce;
use crate::certificate::Certificate;

/// JOSE header of a PoP token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopHeader {
    /// JWS algorithm name such as `ES256`.
    pub alg: String,
    /// Always `JWT`.
    pub typ: String,
}

/// Claims binding the caller's certificate to a server nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopClaims {
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issuance, seconds since the epoch.
    pub iat: i64,
    /// Server nonce; omitted when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// PEM encoding of the caller's certificate.
    pub sub: String,
}

impl PopClaims {
    /// Claims issued at `issued_at`, expiring five seconds later.
    #[must_use]
    pub fn new(certificate: &Certificate, nonce: Option<Nonce>, issued_at: DateTime<Utc>) -> Self {
        let expires_at = issued_at + Duration::seconds(POP_TOKEN_LIFETIME_SECS);
        Self {
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            nonce: nonce.map(Nonce::into_inner).filter(|value| !value.is_empty()),
            sub: certificate.to_pem(),
        }
    }
}

/// Mints proof-of-possession tokens for one certificate and signer.
pub struct PopSigner<'a> {
    certificate: &'a Certificate,
    signer: &'a dyn KeySigner,
}

impl<'a> PopSigner<'a> {
    /// Signer for tokens proving possession of `certificate`'s key.
    #[must_use]
    pub fn new(certificate: &'a Certificate, signer: &'a dyn KeySigner) -> Self {
        Self { certificate, signer }
    }

    /// Sign a token issued now.
    pub fn sign(&self, nonce: Option<Nonce>) -> Result<String, SigningError> {
        self.sign_at(nonce, Utc::now())
    }

    /// Sign a token with an explicit issuance time.
    ///
    /// # Errors
    /// - `UnsupportedKeyType` for keys other than RSA and P-256/384/521
    /// - `HashUnavailable` when the signer cannot use the algorithm's hash
    /// - `InvalidSignatureEncoding` when an ECDSA signer returns malformed DER
    /// - `Signer` when the signing capability itself fails
    pub fn sign_at(
        &self,
        nonce: Option<Nonce>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let algorithm = KeyAlgorithm::for_certificate(self.certificate)?;
        let hash = algorithm.hash();
        if !self.signer.supports_hash(hash) {
            return Err(SigningError::HashUnavailable(hash));
        }

        let claims = PopClaims::new(self.certificate, nonce, issued_at);
        let signing_input = signing_input(algorithm, &claims)?;

        let digest = algorithm.digest(signing_input.as_bytes());
        let raw = self.signer.sign(&digest, hash)?;
        let signature = algorithm.encode_signature(raw)?;

        Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }
}

/// `base64url(header) "." base64url(claims)`.
pub fn signing_input(algorithm: KeyAlgorithm, claims: &PopClaims) -> Result<String, SigningError> {
    let header = PopHeader { alg: algorithm.name().to_string(), typ: "JWT".to_string() };
    let header = serde_json::to_vec(&header)
        .map_err(|e| SigningError::Signer(format!("cannot encode token header: {e}")))?;
    let claims = serde_json::to_vec(claims)
        .map_err(|e| SigningError::Signer(format!("cannot encode token claims: {e}")))?;

    Ok(format!("{}.{}", URL_SAFE_NO_PAD.encode(header), URL_SAFE_NO_PAD.encode(claims)))
}
