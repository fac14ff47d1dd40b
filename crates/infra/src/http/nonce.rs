//! Nonce exchange for JWT proof-of-possession
//!
//! Before each JWT-authenticated call the client sends a throwaway probe with
//! the same method and URL. The probe carries the `{}` marker instead of a
//! token, so the server answers it without full authentication and hands out
//! a fresh `Replay-Nonce`. The probe body is discarded.

use horizon_core::{Nonce, TransportObserver};
use horizon_domain::constants::{
    JSON_MIME, JWT_POP_HEADER, NONCE_PROBE_BODY, NONCE_PROBE_MARKER, REPLAY_NONCE_HEADER,
};
use horizon_domain::{HorizonError, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use url::Url;

use crate::errors::transport_error;

/// Obtain a single-use nonce for `method url`.
///
/// # Errors
/// - `Transport` if the probe cannot be sent
/// - `MissingNonce` if the probe response has no usable `Replay-Nonce`,
///   whatever its status code
pub fn fetch_nonce(
    client: &Client,
    method: &Method,
    url: &Url,
    observer: &dyn TransportObserver,
) -> Result<Nonce> {
    observer.nonce_probe(method.as_str(), url.as_str());

    let response = client
        .request(method.clone(), url.clone())
        .header(JWT_POP_HEADER, NONCE_PROBE_MARKER)
        .header(CONTENT_TYPE, JSON_MIME)
        .body(NONCE_PROBE_BODY)
        .send()
        .map_err(|err| match transport_error(err) {
            HorizonError::Transport(reason) => {
                HorizonError::Transport(format!("could not get nonce for JWT: {reason}"))
            }
            other => other,
        })?;

    observer.response_received(method.as_str(), url.as_str(), response.status().as_u16());

    let nonce = response
        .headers()
        .get(REPLAY_NONCE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(Nonce::from_header);

    drop(response);
    nonce.ok_or(HorizonError::MissingNonce)
}
