//! # Horizon Core
//!
//! Transport-independent logic of the Horizon client.
//!
//! This crate contains:
//! - X.509 certificate handling
//! - The credential strategy (one active authentication mode)
//! - Proof-of-possession token signing
//! - Port interfaces (traits) for transport diagnostics
//!
//! ## Architecture Principles
//! - Only depends on `horizon-domain`
//! - No HTTP or platform code

pub mod auth;
pub mod certificate;
pub mod pop;

// Infrastructure ports
pub mod transport_ports;

pub use auth::{AuthMode, ClientCertificate, CredentialStrategy, Credentials, JwtPop, SharedSecret};
pub use certificate::{Certificate, KeyType, NamedCurve};
pub use pop::{der_to_fixed_width, KeyAlgorithm, Nonce, PopClaims, PopSigner};
pub use transport_ports::{NoopObserver, TransportObserver};
