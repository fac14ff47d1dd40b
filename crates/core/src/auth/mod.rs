//! Authentication modes for the Horizon transport

pub mod credentials;

pub use credentials::{
    AuthMode, ClientCertificate, CredentialStrategy, Credentials, JwtPop, SharedSecret,
};
