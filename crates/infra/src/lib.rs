//! # Horizon Infrastructure
//!
//! Infrastructure implementations of the Horizon client.
//!
//! This crate contains:
//! - The blocking HTTP client (request dispatch, nonce exchange, response
//!   classification)
//! - Configuration loading from environment variables and files
//! - `tracing` and counter based transport observers
//!
//! ## Architecture
//! - Implements ports defined in `horizon-core`
//! - Contains all "impure" code (network and file I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use http::*;
pub use observability::{TracingObserver, TransportMetrics, TransportStats};
