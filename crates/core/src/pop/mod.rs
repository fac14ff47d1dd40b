//! Certificate-bound proof-of-possession tokens
//!
//! A token is a compact JWS whose claims carry the caller's PEM certificate,
//! a five second validity window and the server nonce. The signature comes
//! from an abstract [`KeySigner`](horizon_domain::KeySigner), so the private
//! key never has to be in memory.

pub mod algorithm;
pub mod der;
pub mod nonce;
pub mod token;

pub use algorithm::KeyAlgorithm;
pub use der::der_to_fixed_width;
pub use nonce::Nonce;
pub use token::{signing_input, PopClaims, PopHeader, PopSigner};
