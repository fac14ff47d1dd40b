#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use horizon_common::testing::{fixtures, EcdsaP256Signer, RsaPkcs1Signer};
use horizon_core::{AuthMode, Certificate, TransportObserver};
use horizon_domain::KeySigner;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// Wiremock server driven by its own runtime so that tests can call the
/// blocking client from the test thread.
pub struct MockHorizon {
    // dropped before the runtime
    server: MockServer,
    runtime: Runtime,
}

impl MockHorizon {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("tokio runtime should start");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn received_requests(&self) -> Vec<Request> {
        self.runtime.block_on(self.server.received_requests()).unwrap_or_default()
    }
}

/// Address nobody listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn p256_material() -> (Certificate, Arc<dyn KeySigner>) {
    let certificate = Certificate::from_pem(fixtures::P256.certificate_pem.as_bytes())
        .expect("P-256 fixture certificate");
    let signer: Arc<dyn KeySigner> = Arc::new(
        EcdsaP256Signer::from_pkcs8_pem(fixtures::P256.private_key_pem)
            .expect("P-256 fixture key"),
    );
    (certificate, signer)
}

pub fn rsa_material() -> (Certificate, Arc<dyn KeySigner>) {
    let certificate = Certificate::from_pem(fixtures::RSA_2048.certificate_pem.as_bytes())
        .expect("RSA fixture certificate");
    let signer: Arc<dyn KeySigner> = Arc::new(
        RsaPkcs1Signer::from_pkcs8_pem(fixtures::RSA_2048.private_key_pem)
            .expect("RSA fixture key"),
    );
    (certificate, signer)
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|value| value.to_str().ok())
}

/// Observer that remembers every event as a line of text.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    fn push(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl TransportObserver for RecordingObserver {
    fn auth_mode(&self, mode: AuthMode) {
        self.push(format!("auth {mode}"));
    }

    fn nonce_probe(&self, method: &str, url: &str) {
        self.push(format!("probe {method} {url}"));
    }

    fn request_sent(&self, method: &str, url: &str) {
        self.push(format!("send {method} {url}"));
    }

    fn response_received(&self, method: &str, url: &str, status: u16) {
        self.push(format!("recv {method} {url} {status}"));
    }
}
