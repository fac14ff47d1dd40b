//! Domain types shared by the transport layers

pub mod feature;
pub mod signer;

pub use feature::Feature;
pub use signer::{HashAlgorithm, KeySigner};
