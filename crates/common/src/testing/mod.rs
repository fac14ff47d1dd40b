//! Testing utilities and helpers
//!
//! This module provides:
//! - **[`fixtures`]**: PEM certificates and keys for every key type
//! - **[`signers`]**: in-memory [`KeySigner`](horizon_domain::KeySigner)
//!   implementations plus independent verifiers
//!
//! ## Usage
//!
//! ```ignore
//! use horizon_common::testing::fixtures;
//! use horizon_common::testing::signers::EcdsaP256Signer;
//!
//! let signer = EcdsaP256Signer::from_pkcs8_pem(fixtures::P256.private_key_pem).unwrap();
//! # let _ = signer;
//! ```

pub mod fixtures;
pub mod signers;

pub use fixtures::Fixture;
pub use signers::{EcdsaP256Signer, EcdsaP384Signer, RsaPkcs1Signer};
