//! Credential strategy
//!
//! Exactly one authentication mode is active at a time. The sum type makes
//! that a property of the data rather than a convention between fields.

use std::fmt;
use std::sync::Arc;

use horizon_domain::{impl_domain_enum_conversions, HorizonError, KeySigner, Result};
use x509_parser::pem::parse_x509_pem;
use zeroize::Zeroizing;

use crate::certificate::Certificate;

/// Identifier/secret pair sent as `X-API-ID` / `X-API-KEY`.
#[derive(Clone)]
pub struct SharedSecret {
    id: String,
    key: Zeroizing<String>,
}

impl SharedSecret {
    /// Pair an API identifier with its secret key.
    #[must_use]
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self { id: id.into(), key: Zeroizing::new(key.into()) }
    }

    /// API identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The secret; never logged.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret").field("id", &self.id).field("key", &"<redacted>").finish()
    }
}

/// Certificate and private key installed into the TLS configuration.
#[derive(Clone)]
pub struct ClientCertificate {
    certificate: Certificate,
    private_key_pem: Zeroizing<Vec<u8>>,
}

impl ClientCertificate {
    /// Validate both PEM halves up front so installing them cannot fail later.
    pub fn from_pem(certificate_pem: &[u8], private_key_pem: &[u8]) -> Result<Self> {
        let certificate = Certificate::from_pem(certificate_pem)?;
        let (_, key) = parse_x509_pem(private_key_pem)
            .map_err(|e| HorizonError::Config(format!("invalid private key PEM: {e}")))?;
        if !key.label.ends_with("PRIVATE KEY") {
            return Err(HorizonError::Config(format!(
                "expected a private key PEM block, found {}",
                key.label
            )));
        }
        Ok(Self { certificate, private_key_pem: Zeroizing::new(private_key_pem.to_vec()) })
    }

    /// The certificate presented during the TLS handshake.
    #[must_use]
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Private key followed by the certificate, as TLS identity loaders expect.
    #[must_use]
    pub fn identity_pem(&self) -> Zeroizing<Vec<u8>> {
        let mut pem = Zeroizing::new(self.private_key_pem.to_vec());
        if !pem.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend_from_slice(self.certificate.to_pem().as_bytes());
        pem
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Certificate plus signing capability used to mint PoP tokens.
#[derive(Clone)]
pub struct JwtPop {
    certificate: Certificate,
    signer: Arc<dyn KeySigner>,
}

impl JwtPop {
    /// Pair a certificate with the capability that signs for its key.
    #[must_use]
    pub fn new(certificate: Certificate, signer: Arc<dyn KeySigner>) -> Self {
        Self { certificate, signer }
    }

    /// Certificate embedded as the token subject.
    #[must_use]
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Capability that produces raw signatures over a digest.
    #[must_use]
    pub fn signer(&self) -> &dyn KeySigner {
        self.signer.as_ref()
    }
}

impl fmt::Debug for JwtPop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtPop").field("certificate", &self.certificate).finish_non_exhaustive()
    }
}

/// The active credential, if any.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// No authentication header or client certificate.
    #[default]
    None,
    /// `X-API-ID` / `X-API-KEY` headers on every request.
    SharedSecret(SharedSecret),
    /// Mutual TLS.
    ClientCertificate(ClientCertificate),
    /// Per-request proof-of-possession token bound to a server nonce.
    JwtPop(JwtPop),
}

/// Credential mode without the secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Unauthenticated.
    None,
    /// API identifier and key headers.
    SharedSecret,
    /// Mutual TLS.
    ClientCertificate,
    /// Proof-of-possession token.
    JwtPop,
}

impl_domain_enum_conversions!(AuthMode {
    None => "none",
    SharedSecret => "shared_secret",
    ClientCertificate => "client_certificate",
    JwtPop => "jwt_pop",
});

impl Credentials {
    /// Mode of the active credential.
    #[must_use]
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::None => AuthMode::None,
            Self::SharedSecret(_) => AuthMode::SharedSecret,
            Self::ClientCertificate(_) => AuthMode::ClientCertificate,
            Self::JwtPop(_) => AuthMode::JwtPop,
        }
    }
}

/// Holder of the active credential.
///
/// Setters need `&mut self`; switching credentials while a request is in
/// flight on another thread is not supported.
#[derive(Debug, Clone, Default)]
pub struct CredentialStrategy {
    active: Credentials,
}

impl CredentialStrategy {
    /// Strategy with no active credential.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to shared-secret authentication.
    pub fn set_shared_secret(&mut self, id: impl Into<String>, key: impl Into<String>) {
        self.clear_auth();
        self.active = Credentials::SharedSecret(SharedSecret::new(id, key));
    }

    /// Switch to mutual TLS with `certificate`.
    pub fn set_client_certificate(&mut self, certificate: ClientCertificate) {
        self.clear_auth();
        self.active = Credentials::ClientCertificate(certificate);
    }

    /// Switch to proof-of-possession tokens signed by `signer`.
    pub fn set_jwt_pop(&mut self, certificate: Certificate, signer: Arc<dyn KeySigner>) {
        self.clear_auth();
        self.active = Credentials::JwtPop(JwtPop::new(certificate, signer));
    }

    /// Drop whatever credential is active. Idempotent.
    pub fn clear_auth(&mut self) {
        self.active = Credentials::None;
    }

    /// Whether PoP tokens are being minted.
    #[must_use]
    pub fn is_jwt_active(&self) -> bool {
        matches!(self.active, Credentials::JwtPop(_))
    }

    /// Mode of the active credential.
    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.active.mode()
    }

    /// The active credential.
    #[must_use]
    pub fn active(&self) -> &Credentials {
        &self.active
    }

    /// TLS client certificate to install, if that mode is active.
    #[must_use]
    pub fn client_certificate(&self) -> Option<&ClientCertificate> {
        match &self.active {
            Credentials::ClientCertificate(certificate) => Some(certificate),
            _ => None,
        }
    }
}
