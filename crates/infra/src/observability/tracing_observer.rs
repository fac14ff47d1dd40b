use horizon_core::{AuthMode, TransportObserver};
use tracing::debug;

/// Observer that logs every transport event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    /// Observer logging at `debug` level.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TransportObserver for TracingObserver {
    fn auth_mode(&self, mode: AuthMode) {
        debug!(%mode, "authenticating HTTP request");
    }

    fn nonce_probe(&self, method: &str, url: &str) {
        debug!(%method, %url, "requesting JWT nonce");
    }

    fn request_sent(&self, method: &str, url: &str) {
        debug!(%method, %url, "sending HTTP request");
    }

    fn response_received(&self, method: &str, url: &str, status: u16) {
        debug!(%method, %url, status, "received HTTP response");
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn events_carry_method_url_and_status() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let observer = TracingObserver::new();
            observer.auth_mode(AuthMode::JwtPop);
            observer.nonce_probe("POST", "https://pki.example/api/v1/x");
            observer.response_received("POST", "https://pki.example/api/v1/x", 201);
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("mode=jwt_pop"), "{output}");
        assert!(output.contains("requesting JWT nonce"), "{output}");
        assert!(output.contains("status=201"), "{output}");
        assert!(output.contains("https://pki.example/api/v1/x"), "{output}");
    }
}
