//! Infrastructure error conversions

pub mod conversions;

pub use conversions::{transport_error, InfraError};
