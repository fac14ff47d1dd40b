//! Transport observers
//!
//! Implementations of [`horizon_core::TransportObserver`]:
//! - [`TracingObserver`] forwards events to `tracing` at debug level
//! - [`TransportMetrics`] keeps lock-free counters and hands out snapshots
//!
//! Neither ever sees credentials or tokens; the transport only reports the
//! method, URL, status and authentication mode.

pub mod tracing_observer;
pub mod transport_metrics;

pub use tracing_observer::TracingObserver;
pub use transport_metrics::{TransportMetrics, TransportStats};
