use thiserror::Error;

/// Typed causes carried inside the `anyhow::Error` values returned by the
/// client. Operations downcast to this type to pick a result code.
#[derive(Debug, Error)]
pub enum DavError {
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("could not connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),

    #[error("redirect from {0} without a usable Location header")]
    BrokenRedirect(String),

    #[error("malformed multistatus body: {0}")]
    Xml(String),

    #[error("malformed OCS body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OCS request failed with status {code}: {message}")]
    Ocs { code: u16, message: String },

    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
}
