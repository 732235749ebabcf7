use anyhow::{Context, Result};
use std::env;
use tokio::time::Duration;

use crate::common::auth::Credentials;
use crate::common::error::DavError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("nc-dav-rs/", env!("CARGO_PKG_VERSION"));

/// Tuning knobs shared by every request a client sends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    /// Default redirect policy; single requests may still opt out.
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            follow_redirects: true,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `NEXTCLOUD_TIMEOUT_SECS`, `NEXTCLOUD_MAX_REDIRECTS`
    /// and `NEXTCLOUD_USER_AGENT` when set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            timeout: env::var("NEXTCLOUD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            follow_redirects: defaults.follow_redirects,
            max_redirects: env::var("NEXTCLOUD_MAX_REDIRECTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_redirects),
            user_agent: env::var("NEXTCLOUD_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

/// Server location and account, usually read from the environment.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub base_url: String,
    pub credentials: Credentials,
    /// Defaults to the login name when unset.
    pub user_id: String,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("NEXTCLOUD_URL").context(DavError::MissingConfig("NEXTCLOUD_URL"))?;
        let user = env::var("NEXTCLOUD_USER").context(DavError::MissingConfig("NEXTCLOUD_USER"))?;
        let password =
            env::var("NEXTCLOUD_PASSWORD").context(DavError::MissingConfig("NEXTCLOUD_PASSWORD"))?;
        let user_id = env::var("NEXTCLOUD_USER_ID").unwrap_or_else(|_| user.clone());

        Ok(Self {
            base_url,
            credentials: Credentials::new(user, password),
            user_id,
        })
    }
}
