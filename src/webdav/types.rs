use bytes::Bytes;
use hyper::{HeaderMap, Method, StatusCode, header};
use std::sync::Arc;

use crate::common::auth::Authenticator;

/// WebDAV Depth
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
    Infinity,
}
impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

/// How a request proves who is calling.
#[derive(Clone, Default)]
pub enum AuthMode {
    /// `Authorization` sent up front with the client's credentials.
    #[default]
    Preemptive,
    /// Nothing sent up front; a `401` is answered by the authenticator.
    Challenge(Arc<dyn Authenticator>),
    None,
}

/// A prepared request; `url` is absolute.
#[derive(Clone)]
pub struct DavRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// `None` uses the client default.
    pub follow_redirects: Option<bool>,
    pub auth: AuthMode,
}

impl DavRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            follow_redirects: None,
            auth: AuthMode::Preemptive,
        }
    }

    pub fn header(mut self, name: header::HeaderName, value: header::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn xml_body(mut self, body: String) -> Self {
        self.headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/xml; charset=utf-8"),
        );
        self.body = Some(Bytes::from(body));
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }

    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }
}

/// Status, headers and aggregated body of a finished request.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl DavResponse {
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// 2xx, which includes `207 Multi-Status`.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A sharee listed under `nc:sharees`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavSharee {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub share_type: Option<String>,
}

/// Raw property values of one `<d:response>`, as text.
///
/// A field is `None` when the property was missing or came back in a non-2xx propstat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavProperties {
    pub displayname: Option<String>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub last_modified: Option<String>,
    pub creation_date: Option<String>,
    /// `Some(_)` once `<d:resourcetype>` was seen; `true` when it holds `<d:collection/>`.
    pub is_collection: Option<bool>,
    pub quota_used: Option<String>,
    pub quota_available: Option<String>,
    pub permissions: Option<String>,
    pub remote_id: Option<String>,
    pub file_id: Option<String>,
    pub size: Option<String>,
    pub favorite: Option<String>,
    pub owner_id: Option<String>,
    pub owner_display_name: Option<String>,
    pub comments_unread: Option<String>,
    pub mount_type: Option<String>,
    pub rich_workspace: Option<String>,
    pub note: Option<String>,
    pub is_encrypted: Option<String>,
    pub has_preview: Option<String>,
    pub hidden: Option<String>,
    pub lock: Option<String>,
    pub creation_time: Option<String>,
    pub upload_time: Option<String>,
    pub sharees: Option<Vec<DavSharee>>,
    pub tags: Option<Vec<String>>,
}

fn overlay<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

impl DavProperties {
    /// Copy every property present in `other` over `self`.
    pub fn merge(&mut self, other: DavProperties) {
        overlay(&mut self.displayname, other.displayname);
        overlay(&mut self.etag, other.etag);
        overlay(&mut self.content_type, other.content_type);
        overlay(&mut self.content_length, other.content_length);
        overlay(&mut self.last_modified, other.last_modified);
        overlay(&mut self.creation_date, other.creation_date);
        overlay(&mut self.is_collection, other.is_collection);
        overlay(&mut self.quota_used, other.quota_used);
        overlay(&mut self.quota_available, other.quota_available);
        overlay(&mut self.permissions, other.permissions);
        overlay(&mut self.remote_id, other.remote_id);
        overlay(&mut self.file_id, other.file_id);
        overlay(&mut self.size, other.size);
        overlay(&mut self.favorite, other.favorite);
        overlay(&mut self.owner_id, other.owner_id);
        overlay(&mut self.owner_display_name, other.owner_display_name);
        overlay(&mut self.comments_unread, other.comments_unread);
        overlay(&mut self.mount_type, other.mount_type);
        overlay(&mut self.rich_workspace, other.rich_workspace);
        overlay(&mut self.note, other.note);
        overlay(&mut self.is_encrypted, other.is_encrypted);
        overlay(&mut self.has_preview, other.has_preview);
        overlay(&mut self.hidden, other.hidden);
        overlay(&mut self.lock, other.lock);
        overlay(&mut self.creation_time, other.creation_time);
        overlay(&mut self.upload_time, other.upload_time);
        overlay(&mut self.sharees, other.sharees);
        overlay(&mut self.tags, other.tags);
    }
}

/// One `<d:response>` of a multistatus body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavEntry {
    pub href: String,
    pub status: Option<String>,
    pub properties: DavProperties,
}
