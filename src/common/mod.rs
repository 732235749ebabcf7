pub mod auth;
pub mod compression;
pub mod config;
pub mod error;
pub mod http;

pub use auth::{Authenticator, Credentials, Exchange, MAX_AUTH_ATTEMPTS, NextcloudAuthenticator};
pub use compression::{ContentEncoding, add_accept_encoding, decompress_body, detect_encodings};
pub use config::{ClientConfig, ServerSettings};
pub use error::DavError;
pub use http::{HttpTransport, HyperClient, HyperTransport, build_hyper_client};
