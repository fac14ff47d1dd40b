//! Shared helpers for the Horizon crates.
//!
//! # Feature Tiers
//!
//! - `test-utils`: certificate fixtures and software signers for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;
