//! Blocking HTTP transport for the Horizon REST API

pub mod client;
pub mod nonce;
pub mod path;
pub mod response;

pub use client::{HttpClient, HttpClientBuilder};
pub use nonce::fetch_nonce;
pub use path::join_path;
pub use response::{classify, has_content_type, RawResponse, ResponseHandle};
