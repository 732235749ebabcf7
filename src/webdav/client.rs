use anyhow::{Result, anyhow};
use bytes::Bytes;
use hyper::{HeaderMap, Method, Request, StatusCode, Uri, header};
use std::sync::Arc;
use tokio::time::timeout;

use crate::common::auth::{Authenticator, Credentials, Exchange, NextcloudAuthenticator};
use crate::common::compression::add_accept_encoding;
use crate::common::config::{ClientConfig, ServerSettings};
use crate::common::error::DavError;
use crate::common::http::{HttpTransport, HyperTransport};
use crate::files::utils::encode_path;
use crate::webdav::properties::DavProperty;
use crate::webdav::types::{AuthMode, DavRequest, DavResponse, Depth};
use crate::webdav::xml::build_propfind_body;

const DAV_ROOT: &str = "/remote.php/dav";
const OCS_ROOT: &str = "/ocs/v1.php";

/// Connection to one Nextcloud account.
///
/// Knows the server base URL, the credentials and the user id, and turns a
/// [`DavRequest`] into a [`DavResponse`]: it adds the `Authorization` header or
/// answers `401` challenges, follows redirects when allowed, and enforces the
/// per-request timeout.
///
/// Cloning is cheap and shares the same transport (and its connection pool).
#[derive(Clone)]
pub struct NextcloudClient {
    base_url: String,
    credentials: Credentials,
    user_id: String,
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl NextcloudClient {
    /// Create a client for `base_url` (e.g. `https://cloud.example.com/nextcloud`) using the
    /// login name as user id.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Self::with_transport(
            base_url,
            Credentials::new(username, password),
            username,
            ClientConfig::default(),
            Arc::new(HyperTransport::new()?),
        )
    }

    pub fn from_settings(settings: ServerSettings, config: ClientConfig) -> Result<Self> {
        Self::with_transport(
            &settings.base_url,
            settings.credentials,
            settings.user_id,
            config,
            Arc::new(HyperTransport::new()?),
        )
    }

    /// Build a client on top of any [`HttpTransport`].
    pub fn with_transport(
        base_url: &str,
        credentials: Credentials,
        user_id: impl Into<String>,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let trimmed = base_url.trim_end_matches('/');
        let parsed: Uri = trimmed.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            DavError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        if parsed.scheme().is_none() || parsed.authority().is_none() {
            return Err(DavError::InvalidUrl {
                url: base_url.to_string(),
                reason: "expected an absolute http(s) url".to_string(),
            }
            .into());
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            credentials,
            user_id: user_id.into(),
            config,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `<base>/remote.php/dav`
    pub fn dav_uri(&self) -> String {
        format!("{}{}", self.base_url, DAV_ROOT)
    }

    /// Path component of the user's files root, e.g. `/nextcloud/remote.php/dav/files/alice`.
    ///
    /// Hrefs in multistatus bodies start with this prefix.
    pub fn files_dav_path(&self) -> String {
        let base_path = self
            .base_url
            .parse::<Uri>()
            .map(|u| u.path().trim_end_matches('/').to_string())
            .unwrap_or_default();
        format!("{}{}/files/{}", base_path, DAV_ROOT, encode_path(&self.user_id))
    }

    /// Absolute WebDAV URL of `remote_path` inside the user's files root.
    pub fn files_dav_uri(&self, remote_path: &str) -> String {
        let mut url = format!("{}/files/{}", self.dav_uri(), encode_path(&self.user_id));
        if !remote_path.is_empty() && !remote_path.starts_with('/') {
            url.push('/');
        }
        url.push_str(&encode_path(remote_path));
        url
    }

    /// Absolute URL of an OCS endpoint, e.g. `cloud/capabilities`.
    pub fn ocs_uri(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.base_url, OCS_ROOT, endpoint.trim_start_matches('/'))
    }

    /// Authenticator answering challenges with this client's credentials.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        Ok(Arc::new(NextcloudAuthenticator::from_credentials(
            &self.credentials,
        )?))
    }

    // ----------- Request execution -----------

    /// Send `request`, resolving authentication and redirects, and return the final response.
    ///
    /// Non-2xx statuses are returned as responses; only transport problems are errors.
    pub async fn execute(&self, request: DavRequest) -> Result<DavResponse> {
        let follow = request
            .follow_redirects
            .unwrap_or(self.config.follow_redirects);

        let mut url = request.url.clone();
        let mut headers = request.headers.clone();
        add_accept_encoding(&mut headers);
        if !headers.contains_key(header::USER_AGENT) {
            headers.insert(
                header::USER_AGENT,
                header::HeaderValue::from_str(&self.config.user_agent)?,
            );
        }
        if matches!(request.auth, AuthMode::Preemptive) {
            headers.insert(header::AUTHORIZATION, self.credentials.to_header_value()?);
        }

        let mut chain: Option<Exchange> = None;
        let mut redirects = 0;

        loop {
            let response = self
                .send_once(&request.method, &url, &headers, request.body.clone())
                .await?;

            if response.status == StatusCode::UNAUTHORIZED {
                if let AuthMode::Challenge(authenticator) = &request.auth {
                    let mut exchange = Exchange::new(headers.clone(), response.status);
                    if let Some(prior) = chain.take() {
                        exchange = exchange.with_prior(prior);
                    }
                    if let Some(next_headers) = authenticator.authenticate(&exchange) {
                        tracing::debug!("answering auth challenge for {url}");
                        headers = next_headers;
                        chain = Some(exchange);
                        continue;
                    }
                }
                return Ok(response);
            }

            if follow && is_followable_redirect(response.status) {
                redirects += 1;
                if redirects > self.config.max_redirects {
                    return Err(DavError::TooManyRedirects(self.config.max_redirects).into());
                }
                let location = response
                    .header(header::LOCATION.as_str())
                    .ok_or_else(|| DavError::BrokenRedirect(url.clone()))?;
                let next = resolve_location(&url, location)?;
                if authority_of(&next) != authority_of(&url) {
                    headers.remove(header::AUTHORIZATION);
                }
                tracing::debug!("following {} redirect {url} -> {next}", response.status);
                url = next;
                continue;
            }

            return Ok(response);
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<DavResponse> {
        let uri: Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| DavError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder = Request::builder().method(method.clone()).uri(uri);
        for (k, v) in headers.iter() {
            builder = builder.header(k, v);
        }
        let req = builder.body(body.unwrap_or_default())?;

        let resp = timeout(self.config.timeout, self.transport.execute(req))
            .await
            .map_err(|_| DavError::Timeout {
                url: url.to_string(),
                secs: self.config.timeout.as_secs(),
            })??;

        let (parts, body) = resp.into_parts();
        Ok(DavResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    // ----------- HTTP/WebDAV Verbs -----------

    /// `PROPFIND` an absolute URL for the given properties.
    pub async fn propfind(
        &self,
        url: &str,
        depth: Depth,
        properties: &[DavProperty],
    ) -> Result<DavResponse> {
        let request = DavRequest::new(Method::from_bytes(b"PROPFIND")?, url)
            .header(
                header::HeaderName::from_static("depth"),
                header::HeaderValue::from_static(depth.as_str()),
            )
            .xml_body(build_propfind_body(properties));
        self.execute(request).await
    }
}

impl std::fmt::Debug for NextcloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextcloudClient")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("credentials", &self.credentials)
            .finish()
    }
}

fn is_followable_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn authority_of(url: &str) -> Option<String> {
    url.parse::<Uri>()
        .ok()
        .and_then(|u| u.authority().map(|a| a.to_string()))
}

/// Resolve a `Location` header against the URL that produced it.
pub(crate) fn resolve_location(current: &str, location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return Ok(location.to_string());
    }

    let uri: Uri = current.parse()?;
    let scheme = uri.scheme_str().ok_or_else(|| anyhow!("no scheme in {current}"))?;
    let authority = uri
        .authority()
        .ok_or_else(|| anyhow!("no authority in {current}"))?;

    if location.starts_with('/') {
        return Ok(format!("{scheme}://{authority}{location}"));
    }

    let dir = match uri.path().rfind('/') {
        Some(idx) => &uri.path()[..=idx],
        None => "/",
    };
    Ok(format!("{scheme}://{authority}{dir}{location}"))
}
