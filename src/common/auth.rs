//! Credentials and challenge-driven authentication.

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use hyper::StatusCode;
use std::fmt;

/// How many prior responses an [`NextcloudAuthenticator`] tolerates before giving up.
pub const MAX_AUTH_ATTEMPTS: usize = 3;

/// Basic credentials for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic <base64(user:pass)>`
    pub fn to_header_value(&self) -> Result<HeaderValue> {
        let token = format!("{}:{}", self.username, self.password);
        let mut value = HeaderValue::from_str(&format!("Basic {}", B64.encode(token)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}

/// A finished exchange as seen by an [`Authenticator`]: the headers that were sent,
/// the status that came back, and the exchange that led to this one (if any).
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request_headers: HeaderMap,
    pub status: StatusCode,
    pub prior: Option<Box<Exchange>>,
}

impl Exchange {
    pub fn new(request_headers: HeaderMap, status: StatusCode) -> Self {
        Self {
            request_headers,
            status,
            prior: None,
        }
    }

    /// Chain `self` behind `prior`.
    pub fn with_prior(mut self, prior: Exchange) -> Self {
        self.prior = Some(Box::new(prior));
        self
    }

    pub fn prior_response(&self) -> Option<&Exchange> {
        self.prior.as_deref()
    }
}

/// Answers a `401` challenge with the headers of the follow-up request, or `None`
/// to give up and hand the `401` back to the caller.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, response: &Exchange) -> Option<HeaderMap>;
}

/// Injects a fixed credential header on challenge, with a loop guard.
#[derive(Clone)]
pub struct NextcloudAuthenticator {
    credentials: HeaderValue,
    header_name: HeaderName,
}

impl NextcloudAuthenticator {
    pub fn new(credentials: HeaderValue) -> Self {
        Self::with_header(credentials, header::AUTHORIZATION)
    }

    pub fn with_header(credentials: HeaderValue, header_name: HeaderName) -> Self {
        Self {
            credentials,
            header_name,
        }
    }

    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        Ok(Self::new(credentials.to_header_value()?))
    }
}

impl Authenticator for NextcloudAuthenticator {
    fn authenticate(&self, response: &Exchange) -> Option<HeaderMap> {
        if response.request_headers.contains_key(&self.header_name) {
            return None;
        }

        let mut attempts = 0;
        let mut counted = response.prior_response();
        while let Some(prior) = counted {
            attempts += 1;
            if attempts == MAX_AUTH_ATTEMPTS {
                tracing::warn!("giving up authentication after {attempts} prior responses");
                return None;
            }
            counted = prior.prior_response();
        }

        let mut headers = response.request_headers.clone();
        headers.insert(self.header_name.clone(), self.credentials.clone());
        Some(headers)
    }
}

impl fmt::Debug for NextcloudAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NextcloudAuthenticator")
            .field("header_name", &self.header_name)
            .finish()
    }
}
