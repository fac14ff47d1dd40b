//! # Horizon Domain
//!
//! Shared types for the Horizon PKI client.
//!
//! This crate contains:
//! - The error taxonomy (`HorizonError`, `SigningError`, `ServerError`)
//! - The abstract signing capability (`KeySigner`) and hash identifiers
//! - Protocol constants (header names, token lifetime)
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Horizon crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
