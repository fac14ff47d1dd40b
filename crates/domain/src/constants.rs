//! Protocol constants
//!
//! Header names and fixed values shared by the transport core.

use std::time::Duration;

// Shared-secret credential pair
/// Header carrying the API identifier.
pub const API_ID_HEADER: &str = "X-API-ID";
/// Header carrying the API secret key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

// Proof-of-possession token, or `{}` on the nonce probe leg
/// Header carrying the PoP token.
pub const JWT_POP_HEADER: &str = "X-JWT-CERT-POP";
/// Value of [`JWT_POP_HEADER`] on a nonce probe.
pub const NONCE_PROBE_MARKER: &str = "{}";
/// Body sent with a nonce probe.
pub const NONCE_PROBE_BODY: &str = "{}";

/// Anti-replay nonce returned by the server.
pub const REPLAY_NONCE_HEADER: &str = "Replay-Nonce";

/// Content type of requests and of most responses.
pub const JSON_MIME: &str = "application/json";
/// RFC 7807 problem details, decoded like plain JSON errors.
pub const PROBLEM_JSON_MIME: &str = "application/problem+json";
/// Content type older servers use to report an unimplemented feature.
pub const TEXT_PLAIN_MIME: &str = "text/plain";

/// Lifetime of a PoP token (`exp - iat`). Not configurable.
pub const POP_TOKEN_LIFETIME_SECS: i64 = 5;

/// Code reported when the server fails with a non-JSON body.
pub const UNKNOWN_ERROR_CODE: &str = "Unknown";
/// Message paired with [`UNKNOWN_ERROR_CODE`].
pub const NON_JSON_ERROR_MESSAGE: &str = "Non-JSON error from Horizon";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
