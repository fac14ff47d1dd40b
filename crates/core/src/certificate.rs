//! X.509 certificate handling for authentication
//!
//! Only what the transport core needs: DER/PEM conversions and a look at the
//! subject public key to pick a signature algorithm.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use horizon_domain::{HorizonError, Result, SigningError};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::{FromDer, X509Certificate};

const PEM_LABEL: &str = "CERTIFICATE";
const PEM_LINE_WIDTH: usize = 64;

const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const OID_CURVE_P256: &str = "1.2.840.10045.3.1.7";
const OID_CURVE_P384: &str = "1.3.132.0.34";
const OID_CURVE_P521: &str = "1.3.132.0.35";

/// A DER-encoded X.509 certificate known to parse.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
}

/// Public key family found in a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    /// RSA of any modulus size.
    Rsa,
    /// ECDSA on the given curve.
    EllipticCurve(NamedCurve),
    /// Anything else, identified by its algorithm OID.
    Other(String),
}

/// Elliptic curves recognised by OID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedCurve {
    /// NIST P-256 (secp256r1).
    P256,
    /// NIST P-384 (secp384r1).
    P384,
    /// NIST P-521 (secp521r1).
    P521,
    /// Any other curve, by OID.
    Unknown(String),
}

impl Certificate {
    /// Wrap DER bytes, checking they hold a certificate.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self> {
        let der = der.into();
        X509Certificate::from_der(&der)
            .map_err(|e| HorizonError::Config(format!("invalid certificate: {e}")))?;
        Ok(Self { der })
    }

    /// Parse the first `CERTIFICATE` block of a PEM buffer.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let (_, block) = parse_x509_pem(pem)
            .map_err(|e| HorizonError::Config(format!("invalid certificate PEM: {e}")))?;
        if block.label != PEM_LABEL {
            return Err(HorizonError::Config(format!(
                "expected a {PEM_LABEL} PEM block, found {}",
                block.label
            )));
        }
        Self::from_der(block.contents)
    }

    /// Raw DER bytes.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// PEM encoding with 64-column base64 lines and a trailing newline.
    #[must_use]
    pub fn to_pem(&self) -> String {
        let encoded = STANDARD.encode(&self.der);
        let mut pem = String::with_capacity(encoded.len() + encoded.len() / PEM_LINE_WIDTH + 64);
        pem.push_str("-----BEGIN CERTIFICATE-----\n");
        for line in encoded.as_bytes().chunks(PEM_LINE_WIDTH) {
            // base64 output is ASCII
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
        pem
    }

    /// Subject DN in RFC 4514 form, empty if it cannot be read.
    #[must_use]
    pub fn subject(&self) -> String {
        X509Certificate::from_der(&self.der)
            .map(|(_, cert)| cert.subject().to_string())
            .unwrap_or_default()
    }

    /// Classify the subject public key.
    pub fn key_type(&self) -> std::result::Result<KeyType, SigningError> {
        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|e| SigningError::InvalidCertificate(e.to_string()))?;
        let spki = cert.public_key();
        let algorithm = spki.algorithm.algorithm.to_id_string();

        match algorithm.as_str() {
            OID_RSA_ENCRYPTION => Ok(KeyType::Rsa),
            OID_EC_PUBLIC_KEY => {
                let curve = spki
                    .algorithm
                    .parameters
                    .as_ref()
                    .and_then(|params| params.as_oid().ok())
                    .map(|oid| oid.to_id_string())
                    .ok_or_else(|| {
                        SigningError::InvalidCertificate(
                            "elliptic curve key without named curve".into(),
                        )
                    })?;
                Ok(KeyType::EllipticCurve(NamedCurve::from_oid(&curve)))
            }
            _ => Ok(KeyType::Other(algorithm)),
        }
    }
}

impl NamedCurve {
    fn from_oid(oid: &str) -> Self {
        match oid {
            OID_CURVE_P256 => Self::P256,
            OID_CURVE_P384 => Self::P384,
            OID_CURVE_P521 => Self::P521,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject())
            .field("der_len", &self.der.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use horizon_common::testing::fixtures;

    use super::*;

    #[test]
    fn pem_round_trip_preserves_der() {
        let cert = Certificate::from_pem(fixtures::P256.certificate_pem.as_bytes()).unwrap();
        let again = Certificate::from_pem(cert.to_pem().as_bytes()).unwrap();
        assert_eq!(cert, again);
    }

    #[test]
    fn pem_lines_are_wrapped_at_64_columns() {
        let cert = Certificate::from_pem(fixtures::RSA_2048.certificate_pem.as_bytes()).unwrap();
        let pem = cert.to_pem();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
        assert!(pem.lines().all(|line| line.len() <= 64 || line.starts_with("-----")));
    }

    #[test]
    fn rejects_private_key_pem() {
        let err = Certificate::from_pem(fixtures::P256.private_key_pem.as_bytes()).unwrap_err();
        assert!(matches!(err, HorizonError::Config(_)));
    }

    #[test]
    fn rejects_garbage_der() {
        assert!(Certificate::from_der(vec![0x30, 0x03, 0x02, 0x01]).is_err());
    }

    #[test]
    fn classifies_key_types() {
        let key_type = |fixture: &fixtures::Fixture| {
            Certificate::from_pem(fixture.certificate_pem.as_bytes()).unwrap().key_type().unwrap()
        };

        assert_eq!(key_type(&fixtures::RSA_2048), KeyType::Rsa);
        assert_eq!(key_type(&fixtures::P256), KeyType::EllipticCurve(NamedCurve::P256));
        assert_eq!(key_type(&fixtures::P384), KeyType::EllipticCurve(NamedCurve::P384));
        assert_eq!(key_type(&fixtures::P521), KeyType::EllipticCurve(NamedCurve::P521));
        assert_eq!(key_type(&fixtures::ED25519), KeyType::Other("1.3.101.112".into()));
    }

    #[test]
    fn subject_is_readable() {
        let cert = Certificate::from_pem(fixtures::P384.certificate_pem.as_bytes()).unwrap();
        assert!(cert.subject().contains("horizon-test-p384"));
    }
}
