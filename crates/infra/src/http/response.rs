//! Response classification
//!
//! Every raw HTTP response becomes either a [`ResponseHandle`] or a typed
//! [`HorizonError`]. Error bodies come in several shapes depending on the
//! server version; all of them are handled here.

use std::fmt;
use std::io::Read;

use horizon_domain::constants::{
    JSON_MIME, NON_JSON_ERROR_MESSAGE, PROBLEM_JSON_MIME, TEXT_PLAIN_MIME, UNKNOWN_ERROR_CODE,
};
use horizon_domain::{ErrorRecord, Feature, HorizonError, Result, ServerError};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Status, headers and an unread body.
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Box<dyn Read + Send>,
}

impl RawResponse {
    /// Wrap a response that has not been read yet.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Read + Send + 'static) -> Self {
        Self { status, headers, body: Box::new(body) }
    }

    /// HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl From<reqwest::blocking::Response> for RawResponse {
    fn from(response: reqwest::blocking::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        Self::new(status, headers, response)
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// A successful response whose body is read at most once.
///
/// The first access reads the stream and keeps the bytes, so the body can be
/// decoded any number of times afterwards.
pub struct ResponseHandle {
    status: StatusCode,
    headers: HeaderMap,
    reader: Option<Box<dyn Read + Send>>,
    body: Option<Vec<u8>>,
}

impl ResponseHandle {
    fn new(raw: RawResponse) -> Self {
        Self { status: raw.status, headers: raw.headers, reader: Some(raw.body), body: None }
    }

    /// HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether any media type in `Content-Type` equals `mime`, ignoring
    /// parameters and case.
    pub fn has_content_type(&self, mime: &str) -> bool {
        has_content_type(&self.headers, mime)
    }

    /// Body bytes, read from the stream on first call.
    pub fn bytes(&mut self) -> Result<&[u8]> {
        if let Some(mut reader) = self.reader.take() {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|e| HorizonError::Transport(format!("cannot read response body: {e}")))?;
            self.body = Some(buf);
        }
        Ok(self.body.as_deref().unwrap_or_default())
    }

    /// Body as UTF-8, lossily converted.
    pub fn text(&mut self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.bytes()?).into_owned())
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.bytes()?;
        serde_json::from_slice(bytes).map_err(|e| HorizonError::Decode {
            reason: format!("cannot deserialize response JSON: {e}"),
            body: String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    /// Fail with `Unimplemented` when the server answered in plain text,
    /// which is how older versions report a missing feature.
    pub fn require_feature(&self, feature: Feature) -> Result<()> {
        if self.has_content_type(TEXT_PLAIN_MIME) {
            return Err(HorizonError::Unimplemented {
                feature,
                implemented_in: feature.implemented_in(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ResponseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_read", &self.body.is_some())
            .finish()
    }
}

/// Check a (possibly comma-separated, possibly parameterized) `Content-Type`.
///
/// Scanning stops at the first entry that is not a media type.
pub fn has_content_type(headers: &HeaderMap, mime: &str) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) else {
        return false;
    };

    for entry in value.split(',') {
        let media_type = entry.split(';').next().unwrap_or_default().trim();
        if media_type.is_empty() || !media_type.contains('/') {
            break;
        }
        if media_type.eq_ignore_ascii_case(mime) {
            return true;
        }
    }
    false
}

/// Turn a raw response into a handle or an error.
///
/// Status below 300 is success. Otherwise JSON bodies are decoded as a list
/// of error records or as one record; non-JSON bodies become an
/// `Unknown` record whose detail is the raw text.
pub fn classify(raw: RawResponse) -> Result<ResponseHandle> {
    let status = raw.status;
    if status.as_u16() < 300 {
        return Ok(ResponseHandle::new(raw));
    }

    let is_json =
        has_content_type(&raw.headers, JSON_MIME) || has_content_type(&raw.headers, PROBLEM_JSON_MIME);

    let mut body = Vec::new();
    let mut reader = raw.body;
    reader
        .read_to_end(&mut body)
        .map_err(|e| HorizonError::Transport(format!("cannot read error body: {e}")))?;

    let error = if is_json {
        decode_error_body(&body)?
    } else {
        ServerError::Single(ErrorRecord::new(
            UNKNOWN_ERROR_CODE,
            NON_JSON_ERROR_MESSAGE,
            String::from_utf8_lossy(&body),
        ))
    };

    Err(HorizonError::Server { status: status.as_u16(), error })
}

// Any JSON object is one record, missing fields left empty. Arrays are
// tried first because serde would also fill a struct from a sequence.
fn decode_error_body(body: &[u8]) -> Result<ServerError> {
    if let Ok(records) = serde_json::from_slice::<Vec<ErrorRecord>>(body) {
        return Ok(ServerError::Multiple(records));
    }
    if let Ok(record) = serde_json::from_slice::<ErrorRecord>(body) {
        return Ok(ServerError::Single(record));
    }
    Err(HorizonError::Decode {
        reason: "cannot deserialize error JSON".to_string(),
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use reqwest::header::HeaderValue;
    use serde::Deserialize;

    use super::*;

    fn raw(status: u16, content_type: Option<&str>, body: &str) -> RawResponse {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        }
        RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Cursor::new(body.as_bytes().to_vec()),
        )
    }

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn no_content_is_success() {
        let mut handle = classify(raw(204, Some("application/json"), "")).unwrap();
        assert_eq!(handle.status(), StatusCode::NO_CONTENT);
        assert!(handle.bytes().unwrap().is_empty());
    }

    #[test]
    fn redirect_range_starts_the_error_path() {
        let err = classify(raw(300, Some("text/html"), "<html/>")).unwrap_err();
        assert!(matches!(err, HorizonError::Server { status: 300, .. }));

        assert!(classify(raw(299, None, "")).is_ok());
    }

    #[test]
    fn single_error_is_decoded() {
        let body = r#"{"error":"WEB-001","message":"Bad request","detail":"missing module"}"#;
        let err = classify(raw(400, Some("application/json"), body)).unwrap_err();

        match err {
            HorizonError::Server { status, error: ServerError::Single(record) } => {
                assert_eq!(status, 400);
                assert_eq!(record, ErrorRecord::new("WEB-001", "Bad request", "missing module"));
            }
            other => panic!("expected single server error, got {other:?}"),
        }
    }

    #[test]
    fn error_list_is_decoded_in_order() {
        let body = r#"[
            {"error":"REQ-001","message":"first"},
            {"error":"REQ-002","message":"second","detail":"d"}
        ]"#;
        let err = classify(raw(500, Some("application/json"), body)).unwrap_err();

        match err {
            HorizonError::Server { status: 500, error: ServerError::Multiple(records) } => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].code, "REQ-001");
                assert_eq!(records[1].detail, "d");
            }
            other => panic!("expected multiple server errors, got {other:?}"),
        }
    }

    #[test]
    fn problem_json_with_charset_is_treated_as_json() {
        let body = r#"{"error":"SEC-001","message":"Unauthorized"}"#;
        let err =
            classify(raw(401, Some("application/problem+json; charset=utf-8"), body)).unwrap_err();
        assert_eq!(err.server_records()[0].code, "SEC-001");
    }

    #[test]
    fn plain_text_error_becomes_unknown_record() {
        let err = classify(raw(502, Some("text/plain"), "Bad Gateway from proxy")).unwrap_err();

        match err {
            HorizonError::Server { status: 502, error: ServerError::Single(record) } => {
                assert_eq!(record.code, "Unknown");
                assert_eq!(record.message, "Non-JSON error from Horizon");
                assert_eq!(record.detail, "Bad Gateway from proxy");
            }
            other => panic!("expected unknown server error, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_json_keeps_raw_body() {
        let err = classify(raw(400, Some("application/json"), r#""nope""#)).unwrap_err();

        match err {
            HorizonError::Decode { reason, body } => {
                assert!(reason.contains("error JSON"));
                assert_eq!(body, r#""nope""#);
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn error_record_without_message_keeps_code() {
        let body = r#"{"error":"SEC-AUTH-001","detail":"no permission"}"#;
        let err = classify(raw(403, Some("application/json"), body)).unwrap_err();

        match err {
            HorizonError::Server { status: 403, error: ServerError::Single(record) } => {
                assert_eq!(record, ErrorRecord::new("SEC-AUTH-001", "", "no permission"));
            }
            other => panic!("expected single server error, got {other:?}"),
        }
    }

    #[test]
    fn null_detail_decodes_as_empty() {
        let body = r#"{"error":"WEB-001","message":"Bad","detail":null}"#;
        let err = classify(raw(400, Some("application/json"), body)).unwrap_err();

        match err {
            HorizonError::Server { status: 400, error: ServerError::Single(record) } => {
                assert_eq!(record, ErrorRecord::new("WEB-001", "Bad", ""));
            }
            other => panic!("expected single server error, got {other:?}"),
        }
    }

    #[test]
    fn object_without_known_fields_is_an_empty_record() {
        let err = classify(raw(400, Some("application/json"), r#"{"status":"nope"}"#)).unwrap_err();
        assert_eq!(err.server_records(), &[ErrorRecord::new("", "", "")]);
    }

    #[test]
    fn empty_error_list_stays_a_list() {
        let err = classify(raw(500, Some("application/json"), "[]")).unwrap_err();
        assert!(matches!(
            err,
            HorizonError::Server { error: ServerError::Multiple(ref records), .. } if records.is_empty()
        ));
    }

    #[test]
    fn json_body_is_memoized() {
        #[derive(Deserialize)]
        struct License {
            holder: String,
        }

        let mut handle =
            classify(raw(200, Some("application/json"), r#"{"holder":"ACME"}"#)).unwrap();
        let first: License = handle.json().unwrap();
        let second: serde_json::Value = handle.json().unwrap();

        assert_eq!(first.holder, "ACME");
        assert_eq!(second["holder"], "ACME");
        assert_eq!(handle.text().unwrap(), r#"{"holder":"ACME"}"#);
    }

    #[test]
    fn json_decode_failure_carries_body() {
        let mut handle = classify(raw(200, Some("application/json"), "not json")).unwrap();
        let err = handle.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, HorizonError::Decode { body, .. } if body == "not json"));
    }

    #[test]
    fn content_type_ignores_parameters_and_case() {
        let headers = headers_with("Application/JSON; charset=UTF-8");
        assert!(has_content_type(&headers, "application/json"));
        assert!(!has_content_type(&headers, "text/plain"));
    }

    #[test]
    fn content_type_scans_comma_separated_entries() {
        let headers = headers_with("text/html, text/plain;charset=utf-8");
        assert!(has_content_type(&headers, "text/plain"));
        assert!(has_content_type(&headers, "text/html"));
    }

    #[test]
    fn content_type_stops_at_malformed_entry() {
        let headers = headers_with("garbage, text/plain");
        assert!(!has_content_type(&headers, "text/plain"));
        assert!(!has_content_type(&HeaderMap::new(), "text/plain"));
    }

    #[test]
    fn plain_text_success_gates_feature() {
        let handle = classify(raw(200, Some("text/plain"), "not implemented")).unwrap();
        let err = handle.require_feature(Feature::TrustchainDecoding).unwrap_err();

        match err {
            HorizonError::Unimplemented { feature, implemented_in } => {
                assert_eq!(feature, Feature::TrustchainDecoding);
                assert_eq!(implemented_in, "2.2.2");
            }
            other => panic!("expected unimplemented, got {other:?}"),
        }

        let json = classify(raw(200, Some("application/json"), "[]")).unwrap();
        assert!(json.require_feature(Feature::TrustchainDecoding).is_ok());
    }
}
