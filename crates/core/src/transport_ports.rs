//! Port interface for transport diagnostics
//!
//! The transport never writes logs on its own. Whoever builds the client
//! passes an observer; the default one ignores every event.

use crate::auth::AuthMode;

/// Receives diagnostic events from the HTTP transport.
///
/// Implementations must not assume events arrive from a single thread.
pub trait TransportObserver: Send + Sync {
    /// A request is about to be authenticated with `mode`.
    fn auth_mode(&self, _mode: AuthMode) {}

    /// A nonce probe is about to be sent.
    fn nonce_probe(&self, _method: &str, _url: &str) {}

    fn request_sent(&self, _method: &str, _url: &str) {}

    fn response_received(&self, _method: &str, _url: &str, _status: u16) {}
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransportObserver for NoopObserver {}
