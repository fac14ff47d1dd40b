use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use horizon_core::{
    AuthMode, Certificate, ClientCertificate, CredentialStrategy, Credentials, NoopObserver,
    PopSigner, TransportObserver,
};
use horizon_domain::constants::{
    API_ID_HEADER, API_KEY_HEADER, DEFAULT_TIMEOUT, JSON_MIME, JWT_POP_HEADER,
};
use horizon_domain::{AuthConfig, HorizonConfig, HorizonError, KeySigner, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client as ReqwestClient, RequestBuilder};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::nonce::fetch_nonce;
use super::path::join_path;
use super::response::{classify, RawResponse, ResponseHandle};
use crate::errors::transport_error;

/// Transport settings applied when the underlying reqwest client is built.
#[derive(Debug, Clone)]
struct TransportSettings {
    timeout: Duration,
    proxy: Option<Url>,
    ca_bundle: Option<Vec<u8>>,
    skip_tls_verify: bool,
    user_agent: Option<String>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            ca_bundle: None,
            skip_tls_verify: false,
            user_agent: None,
        }
    }
}

/// Blocking HTTP client for the Horizon REST API.
///
/// Every call joins the path onto the base URL, sets the JSON headers,
/// authenticates with the active credential and classifies the response.
/// Nothing is retried.
///
/// Requests only need `&self`, so one client can serve several threads.
/// Credential and transport setters need `&mut self` and drop the cached
/// reqwest client; it is rebuilt on the next request.
pub struct HttpClient {
    base_url: Url,
    settings: TransportSettings,
    credentials: CredentialStrategy,
    observer: Arc<dyn TransportObserver>,
    client: OnceCell<ReqwestClient>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client for `base_url` with default settings and no credentials.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Base URL every path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Mode of the active credential.
    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.credentials.mode()
    }

    /// Whether requests carry a PoP token.
    #[must_use]
    pub fn is_jwt_active(&self) -> bool {
        self.credentials.is_jwt_active()
    }

    /* ---------------------------------------------------------------------- */
    /* Credentials */
    /* ---------------------------------------------------------------------- */

    /// Authenticate with `X-API-ID` / `X-API-KEY`, replacing any other credential.
    pub fn set_shared_secret(&mut self, id: impl Into<String>, key: impl Into<String>) {
        self.credentials.set_shared_secret(id, key);
        self.invalidate();
    }

    /// Authenticate with mutual TLS, replacing any other credential.
    pub fn set_client_certificate(&mut self, certificate: ClientCertificate) {
        self.credentials.set_client_certificate(certificate);
        self.invalidate();
    }

    /// Authenticate every request with a fresh PoP token signed by `signer`.
    pub fn set_jwt_pop(&mut self, certificate: Certificate, signer: Arc<dyn KeySigner>) {
        self.credentials.set_jwt_pop(certificate, signer);
        self.invalidate();
    }

    /// Send requests without credentials.
    pub fn clear_auth(&mut self) {
        self.credentials.clear_auth();
        self.invalidate();
    }

    /* ---------------------------------------------------------------------- */
    /* Transport */
    /* ---------------------------------------------------------------------- */

    /// Per-request timeout, applied to the nonce probe as well.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.settings.timeout = timeout;
        self.invalidate();
    }

    /// Route requests through `proxy`, or connect directly with `None`.
    pub fn set_proxy(&mut self, proxy: Option<Url>) {
        self.settings.proxy = proxy;
        self.invalidate();
    }

    /// Trust the certificates of a PEM bundle in addition to the built-in roots.
    pub fn set_ca_bundle(&mut self, pem: impl Into<Vec<u8>>) {
        self.settings.ca_bundle = Some(pem.into());
        self.invalidate();
    }

    /// Disable server certificate verification. Only meant for test rigs.
    pub fn skip_tls_verify(&mut self, skip: bool) {
        self.settings.skip_tls_verify = skip;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.client.take();
    }

    fn client(&self) -> Result<&ReqwestClient> {
        self.client.get_or_try_init(|| build_reqwest_client(&self.settings, &self.credentials))
    }

    /* ---------------------------------------------------------------------- */
    /* Requests */
    /* ---------------------------------------------------------------------- */

    /// `GET path`, relative to the base URL.
    pub fn get(&self, path: &str) -> Result<ResponseHandle> {
        self.send(Method::GET, path, None)
    }

    /// `DELETE path`.
    pub fn delete(&self, path: &str) -> Result<ResponseHandle> {
        self.send(Method::DELETE, path, None)
    }

    /// `POST path` with a pre-encoded JSON body.
    pub fn post(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<ResponseHandle> {
        self.send(Method::POST, path, Some(body.into()))
    }

    /// `PUT path` with a pre-encoded JSON body.
    pub fn put(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<ResponseHandle> {
        self.send(Method::PUT, path, Some(body.into()))
    }

    /// `PATCH path` with a pre-encoded JSON body.
    pub fn patch(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<ResponseHandle> {
        self.send(Method::PATCH, path, Some(body.into()))
    }

    /// `POST path` with `body` serialized as JSON.
    pub fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ResponseHandle> {
        self.send(Method::POST, path, Some(encode_json(body)?))
    }

    /// `PUT path` with `body` serialized as JSON.
    pub fn put_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ResponseHandle> {
        self.send(Method::PUT, path, Some(encode_json(body)?))
    }

    /// `PATCH path` with `body` serialized as JSON.
    pub fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ResponseHandle> {
        self.send(Method::PATCH, path, Some(encode_json(body)?))
    }

    /// Authenticate and send one request, then classify the response.
    ///
    /// In JWT mode this costs two round trips: the nonce probe and the call.
    pub fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<ResponseHandle> {
        let url = join_path(&self.base_url, path)?;
        let client = self.client()?;

        let request = client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, JSON_MIME)
            .header(ACCEPT, JSON_MIME);
        let mut request = self.authenticate(client, request, &method, &url)?;
        if let Some(body) = body {
            request = request.body(body);
        }

        self.observer.request_sent(method.as_str(), url.as_str());
        let response = request.send().map_err(transport_error)?;
        self.observer.response_received(
            method.as_str(),
            url.as_str(),
            response.status().as_u16(),
        );

        classify(RawResponse::from(response))
    }

    fn authenticate(
        &self,
        client: &ReqwestClient,
        request: RequestBuilder,
        method: &Method,
        url: &Url,
    ) -> Result<RequestBuilder> {
        self.observer.auth_mode(self.credentials.mode());

        let request = match self.credentials.active() {
            Credentials::JwtPop(pop) => {
                let nonce = fetch_nonce(client, method, url, self.observer.as_ref())?;
                let token = PopSigner::new(pop.certificate(), pop.signer()).sign(Some(nonce))?;
                request.header(JWT_POP_HEADER, sensitive_header(&token)?)
            }
            Credentials::SharedSecret(secret) => request
                .header(API_ID_HEADER, secret.id())
                .header(API_KEY_HEADER, sensitive_header(secret.key())?),
            // bound into the TLS configuration when the client was built
            Credentials::ClientCertificate(_) | Credentials::None => request,
        };
        Ok(request)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("settings", &self.settings)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn encode_json<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(body)
        .map_err(|e| HorizonError::Transport(format!("cannot encode request body: {e}")))
}

fn sensitive_header(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| HorizonError::Transport(format!("invalid credential header value: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

fn build_reqwest_client(
    settings: &TransportSettings,
    credentials: &CredentialStrategy,
) -> Result<ReqwestClient> {
    let mut builder = ReqwestClient::builder().use_rustls_tls().timeout(settings.timeout);

    builder = match &settings.proxy {
        Some(proxy) => {
            builder.proxy(reqwest::Proxy::all(proxy.as_str()).map_err(transport_error)?)
        }
        None => builder.no_proxy(),
    };

    if let Some(agent) = &settings.user_agent {
        builder = builder.user_agent(agent.as_str());
    }

    if let Some(pem) = &settings.ca_bundle {
        for certificate in reqwest::Certificate::from_pem_bundle(pem).map_err(transport_error)? {
            builder = builder.add_root_certificate(certificate);
        }
    }

    if settings.skip_tls_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(certificate) = credentials.client_certificate() {
        let identity =
            reqwest::Identity::from_pem(&certificate.identity_pem()).map_err(transport_error)?;
        builder = builder.identity(identity);
    }

    builder.build().map_err(transport_error)
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    base_url: Option<String>,
    proxy: Option<String>,
    settings: TransportSettings,
    credentials: CredentialStrategy,
    observer: Arc<dyn TransportObserver>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            proxy: None,
            settings: TransportSettings::default(),
            credentials: CredentialStrategy::new(),
            observer: Arc::new(NoopObserver),
        }
    }
}

impl HttpClientBuilder {
    /// Builder pre-filled from a loaded configuration, credential included.
    ///
    /// Reads the CA bundle and client certificate files named in `config`.
    pub fn from_config(config: &HorizonConfig) -> Result<Self> {
        let mut builder = Self::default()
            .base_url(config.base_url.as_str())
            .timeout(config.timeout())
            .skip_tls_verify(config.skip_tls_verify);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.as_str());
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        if let Some(path) = &config.ca_bundle_path {
            builder = builder.ca_bundle(read_file(path, "CA bundle")?);
        }

        match &config.auth {
            Some(AuthConfig::SharedSecret { api_id, api_key }) => {
                builder = builder.shared_secret(api_id.as_str(), api_key.as_str());
            }
            Some(AuthConfig::ClientCertificate { certificate_path, private_key_path }) => {
                let certificate = read_file(certificate_path, "client certificate")?;
                let private_key = zeroize::Zeroizing::new(read_file(private_key_path, "private key")?);
                builder = builder
                    .client_certificate(ClientCertificate::from_pem(&certificate, &private_key)?);
            }
            None => {}
        }

        Ok(builder)
    }

    /// Endpoint without any API path. Required.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout; 30 seconds by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Route requests through this proxy URL.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Extra PEM trust anchors.
    pub fn ca_bundle(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.settings.ca_bundle = Some(pem.into());
        self
    }

    /// Test-only: accept any server certificate.
    pub fn skip_tls_verify(mut self, skip: bool) -> Self {
        self.settings.skip_tls_verify = skip;
        self
    }

    /// `User-Agent` header value.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.settings.user_agent = Some(agent.into());
        self
    }

    /// Receive transport events; defaults to a no-op.
    pub fn observer(mut self, observer: Arc<dyn TransportObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Start in shared-secret mode.
    pub fn shared_secret(mut self, id: impl Into<String>, key: impl Into<String>) -> Self {
        self.credentials.set_shared_secret(id, key);
        self
    }

    /// Start in mutual TLS mode.
    pub fn client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.credentials.set_client_certificate(certificate);
        self
    }

    /// Start in PoP token mode.
    pub fn jwt_pop(mut self, certificate: Certificate, signer: Arc<dyn KeySigner>) -> Self {
        self.credentials.set_jwt_pop(certificate, signer);
        self
    }

    /// Validate the settings and build the underlying reqwest client.
    pub fn build(self) -> Result<HttpClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| HorizonError::Config("base URL is required".into()))?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| HorizonError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        let mut settings = self.settings;
        if let Some(proxy) = self.proxy {
            settings.proxy = Some(
                Url::parse(&proxy)
                    .map_err(|e| HorizonError::Config(format!("invalid proxy URL {proxy:?}: {e}")))?,
            );
        }

        let client = OnceCell::new();
        let built = build_reqwest_client(&settings, &self.credentials)
            .map_err(|e| HorizonError::Config(e.to_string()))?;
        let _ = client.set(built);

        Ok(HttpClient {
            base_url,
            settings,
            credentials: self.credentials,
            observer: self.observer,
            client,
        })
    }
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| HorizonError::Config(format!("cannot read {what} {}: {e}", path.display())))
}
