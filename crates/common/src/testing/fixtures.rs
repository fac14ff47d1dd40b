//! Certificate and key fixtures
//!
//! Self-signed certificates with matching PKCS#8 private keys, one per key
//! type the transport has to handle (or reject).

/// A certificate and its private key, both PEM encoded.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// Short label used in assertion messages.
    pub name: &'static str,
    pub certificate_pem: &'static str,
    pub private_key_pem: &'static str,
}

/// RSA 2048-bit key.
pub const RSA_2048: Fixture = Fixture {
    name: "rsa2048",
    certificate_pem: include_str!("../../fixtures/rsa2048.cert.pem"),
    private_key_pem: include_str!("../../fixtures/rsa2048.key.pem"),
};

/// ECDSA P-256 key.
pub const P256: Fixture = Fixture {
    name: "p256",
    certificate_pem: include_str!("../../fixtures/p256.cert.pem"),
    private_key_pem: include_str!("../../fixtures/p256.key.pem"),
};

/// ECDSA P-384 key.
pub const P384: Fixture = Fixture {
    name: "p384",
    certificate_pem: include_str!("../../fixtures/p384.cert.pem"),
    private_key_pem: include_str!("../../fixtures/p384.key.pem"),
};

/// ECDSA P-521 key.
pub const P521: Fixture = Fixture {
    name: "p521",
    certificate_pem: include_str!("../../fixtures/p521.cert.pem"),
    private_key_pem: include_str!("../../fixtures/p521.key.pem"),
};

/// Supported by TLS but not by the PoP protocol.
pub const ED25519: Fixture = Fixture {
    name: "ed25519",
    certificate_pem: include_str!("../../fixtures/ed25519.cert.pem"),
    private_key_pem: include_str!("../../fixtures/ed25519.key.pem"),
};

/// Every fixture, in the order above.
pub const ALL: [Fixture; 5] = [RSA_2048, P256, P384, P521, ED25519];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_has_both_halves() {
        for fixture in ALL {
            assert!(
                fixture.certificate_pem.contains("BEGIN CERTIFICATE"),
                "{} certificate",
                fixture.name
            );
            assert!(
                fixture.private_key_pem.contains("BEGIN PRIVATE KEY"),
                "{} key",
                fixture.name
            );
        }
    }
}
