//! Request counters for the HTTP transport
//!
//! ## Design
//! - **Simple atomic counters** - No locking needed
//! - **Relaxed ordering** - Independent counters, no derived metrics

use std::sync::atomic::{AtomicU64, Ordering};

use horizon_core::{AuthMode, TransportObserver};

/// Snapshot of transport statistics at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TransportStats {
    /// Requests handed to the network, nonce probes excluded
    pub requests_sent: u64,
    /// Nonce probes sent ahead of JWT-authenticated requests
    pub nonce_probes: u64,
    /// Requests sent with a PoP token or a shared secret header
    pub header_authenticated: u64,
    /// Responses below 300, probes included
    pub successes: u64,
    /// Responses with status 300 or above, probes included
    pub error_responses: u64,
}

/// Observer that counts transport events.
///
/// Share it with the client through an `Arc` and read [`snapshot`] at any
/// time.
///
/// [`snapshot`]: TransportMetrics::snapshot
#[derive(Debug, Default)]
pub struct TransportMetrics {
    requests_sent: AtomicU64,
    nonce_probes: AtomicU64,
    header_authenticated: AtomicU64,
    successes: AtomicU64,
    error_responses: AtomicU64,
}

impl TransportMetrics {
    /// All counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter values.
    #[must_use]
    pub fn snapshot(&self) -> TransportStats {
        TransportStats {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            nonce_probes: self.nonce_probes.load(Ordering::Relaxed),
            header_authenticated: self.header_authenticated.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            error_responses: self.error_responses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.requests_sent.store(0, Ordering::Relaxed);
        self.nonce_probes.store(0, Ordering::Relaxed);
        self.header_authenticated.store(0, Ordering::Relaxed);
        self.successes.store(0, Ordering::Relaxed);
        self.error_responses.store(0, Ordering::Relaxed);
    }
}

impl TransportObserver for TransportMetrics {
    fn auth_mode(&self, mode: AuthMode) {
        if matches!(mode, AuthMode::JwtPop | AuthMode::SharedSecret) {
            self.header_authenticated.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn nonce_probe(&self, _method: &str, _url: &str) {
        self.nonce_probes.fetch_add(1, Ordering::Relaxed);
    }

    fn request_sent(&self, _method: &str, _url: &str) {
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
    }

    fn response_received(&self, _method: &str, _url: &str, status: u16) {
        if status < 300 {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.error_responses.fetch_add(1, Ordering::Relaxed);
        }
    }
}
