//! In-memory Nextcloud used by the unit tests.

use anyhow::Result;
use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use hyper::{HeaderMap, Method, Request, Response, StatusCode, header};
use nc_dav_rs::files::utils::{decode_path, encode_path};
use nc_dav_rs::{ClientConfig, Credentials, HttpTransport, NextcloudClient};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://cloud.example.com";
pub const USER: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const FILES_ROOT: &str = "/remote.php/dav/files/alice";
pub const CAPABILITIES_PATH: &str = "/ocs/v1.php/cloud/capabilities";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct State {
    /// Folder paths without trailing slash; the root is always present.
    folders: BTreeSet<String>,
    files: BTreeMap<String, u64>,
    favorites: BTreeSet<String>,
    requests: Vec<RecordedRequest>,
    scripted: VecDeque<Response<Bytes>>,
    challenge: bool,
    reject_credentials: bool,
    redirect_to: Option<String>,
    capabilities_etag: Option<String>,
    next_file_id: u64,
}

pub struct FakeNextcloud {
    state: Mutex<State>,
}

impl FakeNextcloud {
    pub fn new() -> Arc<Self> {
        let mut state = State {
            next_file_id: 100,
            ..State::default()
        };
        state.folders.insert(String::new());
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    pub fn client(self: &Arc<Self>) -> NextcloudClient {
        self.client_with(ClientConfig::default())
    }

    pub fn client_with(self: &Arc<Self>, config: ClientConfig) -> NextcloudClient {
        NextcloudClient::with_transport(
            BASE_URL,
            Credentials::new(USER, PASSWORD),
            USER,
            config,
            self.clone(),
        )
        .expect("valid base url")
    }

    pub fn add_folder(&self, path: &str) {
        self.state.lock().unwrap().folders.insert(normalize(path));
    }

    pub fn add_file(&self, path: &str, size: u64) {
        self.state.lock().unwrap().files.insert(normalize(path), size);
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.state.lock().unwrap().folders.contains(&normalize(path))
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.state.lock().unwrap().favorites.contains(&normalize(path))
    }

    /// Answer `401` to every request that carries no `Authorization` header.
    pub fn require_challenge(&self) {
        self.state.lock().unwrap().challenge = true;
    }

    /// Answer `401` to everything, credentials or not.
    pub fn reject_credentials(&self) {
        self.state.lock().unwrap().reject_credentials = true;
    }

    /// Answer every WebDAV request with a `301` to `location`.
    pub fn redirect_to(&self, location: &str) {
        self.state.lock().unwrap().redirect_to = Some(location.to_string());
    }

    pub fn set_capabilities_etag(&self, etag: Option<&str>) {
        self.state.lock().unwrap().capabilities_etag = etag.map(str::to_string);
    }

    /// Serve `response` for the next request instead of routing it.
    pub fn push_response(&self, response: Response<Bytes>) {
        self.state.lock().unwrap().scripted.push_back(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.as_str() == method)
            .collect()
    }

    fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let mut state = self.state.lock().unwrap();
        let (parts, body) = request.into_parts();
        state.requests.push(RecordedRequest {
            method: parts.method.clone(),
            uri: parts.uri.to_string(),
            headers: parts.headers.clone(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        if let Some(response) = state.scripted.pop_front() {
            return response;
        }

        let authorized = parts.headers.contains_key(header::AUTHORIZATION);
        if state.reject_credentials || (state.challenge && !authorized) {
            return Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .header(header::WWW_AUTHENTICATE, "Basic realm=\"Nextcloud\"")
                .body(Bytes::new())
                .unwrap();
        }

        let path = parts.uri.path().to_string();
        if path == CAPABILITIES_PATH {
            return capabilities(&state, &parts.headers);
        }

        if let Some(location) = &state.redirect_to {
            return Response::builder()
                .status(StatusCode::MOVED_PERMANENTLY)
                .header(header::LOCATION, location.as_str())
                .body(Bytes::new())
                .unwrap();
        }

        let Some(relative) = path.strip_prefix(FILES_ROOT) else {
            return status_only(StatusCode::NOT_FOUND);
        };
        let remote = normalize(&decode_path(relative));

        match parts.method.as_str() {
            "MKCOL" => mkcol(&mut state, &remote),
            "PROPPATCH" => proppatch(&mut state, &remote, &String::from_utf8_lossy(&body)),
            "PROPFIND" => {
                let depth = parts
                    .headers
                    .get("depth")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("1")
                    .to_string();
                propfind(&state, &remote, &depth)
            }
            _ => status_only(StatusCode::METHOD_NOT_ALLOWED),
        }
    }
}

impl HttpTransport for FakeNextcloud {
    fn execute(&self, request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>> {
        async move { Ok(self.handle(request)) }.boxed()
    }
}

/// Transport that never answers.
pub struct SilentTransport;

impl HttpTransport for SilentTransport {
    fn execute(&self, _request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>> {
        futures::future::pending().boxed()
    }
}

/// Transport that fails every request with `error`.
pub struct FailingTransport {
    pub error: fn() -> anyhow::Error,
}

impl HttpTransport for FailingTransport {
    fn execute(&self, _request: Request<Bytes>) -> BoxFuture<'_, Result<Response<Bytes>>> {
        let error = (self.error)();
        async move { Err(error) }.boxed()
    }
}

pub fn client_over(transport: Arc<dyn HttpTransport>, config: ClientConfig) -> NextcloudClient {
    NextcloudClient::with_transport(
        BASE_URL,
        Credentials::new(USER, PASSWORD),
        USER,
        config,
        transport,
    )
    .expect("valid base url")
}

pub fn normalize(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}

fn status_only(status: StatusCode) -> Response<Bytes> {
    Response::builder().status(status).body(Bytes::new()).unwrap()
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

fn mkcol(state: &mut State, remote: &str) -> Response<Bytes> {
    if state.folders.contains(remote) || state.files.contains_key(remote) {
        return status_only(StatusCode::METHOD_NOT_ALLOWED);
    }
    if !state.folders.contains(&parent_of(remote)) {
        return status_only(StatusCode::CONFLICT);
    }
    state.folders.insert(remote.to_string());
    state.next_file_id += 1;
    Response::builder()
        .status(StatusCode::CREATED)
        .header("OC-FileId", format!("{:08}ocnca", state.next_file_id))
        .body(Bytes::new())
        .unwrap()
}

fn proppatch(state: &mut State, remote: &str, body: &str) -> Response<Bytes> {
    if !state.folders.contains(remote) && !state.files.contains_key(remote) {
        return status_only(StatusCode::NOT_FOUND);
    }
    if body.contains("<d:set>") && body.contains("<oc:favorite>1</oc:favorite>") {
        state.favorites.insert(remote.to_string());
    } else if body.contains("<d:remove>") && body.contains("<oc:favorite/>") {
        state.favorites.remove(remote);
    }
    let href = href_for(remote, state.folders.contains(remote));
    let xml = format!(
        r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>{href}</d:href>
    <d:propstat><d:prop><oc:favorite/></d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat>
  </d:response>
</d:multistatus>"#
    );
    multistatus(xml)
}

fn propfind(state: &State, remote: &str, depth: &str) -> Response<Bytes> {
    let mut xml = String::from(
        r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">"#,
    );

    if state.folders.contains(remote) {
        xml.push_str(&folder_entry(state, remote));
        if depth != "0" {
            for child in state.folders.iter().filter(|f| !f.is_empty() && parent_of(f) == remote) {
                xml.push_str(&folder_entry(state, child));
            }
            for (child, size) in state.files.iter().filter(|(f, _)| parent_of(f) == remote) {
                xml.push_str(&file_entry(state, child, *size));
            }
        }
    } else if let Some(size) = state.files.get(remote) {
        xml.push_str(&file_entry(state, remote, *size));
    } else {
        return status_only(StatusCode::NOT_FOUND);
    }

    xml.push_str("</d:multistatus>");
    multistatus(xml)
}

fn href_for(remote: &str, folder: bool) -> String {
    let mut href = format!("{FILES_ROOT}{}", encode_path(remote));
    if folder {
        href.push('/');
    }
    href
}

fn favorite_of(state: &State, remote: &str) -> u8 {
    u8::from(state.favorites.contains(remote))
}

fn folder_entry(state: &State, remote: &str) -> String {
    format!(
        r#"<d:response><d:href>{}</d:href><d:propstat><d:prop>
<d:getlastmodified>Tue, 10 Jan 2023 08:00:00 GMT</d:getlastmodified>
<d:resourcetype><d:collection/></d:resourcetype>
<d:getetag>"{:x}"</d:getetag>
<oc:favorite>{}</oc:favorite>
<oc:permissions>RGDNVCK</oc:permissions>
<oc:size>0</oc:size>
</d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat>
<d:propstat><d:prop><d:getcontentlength/></d:prop><d:status>HTTP/1.1 404 Not Found</d:status></d:propstat>
</d:response>"#,
        href_for(remote, true),
        remote.len(),
        favorite_of(state, remote),
    )
}

fn file_entry(state: &State, remote: &str, size: u64) -> String {
    format!(
        r#"<d:response><d:href>{}</d:href><d:propstat><d:prop>
<d:getlastmodified>Tue, 10 Jan 2023 08:00:00 GMT</d:getlastmodified>
<d:getcontenttype>text/plain</d:getcontenttype>
<d:getcontentlength>{size}</d:getcontentlength>
<d:resourcetype/>
<d:getetag>"{:x}"</d:getetag>
<oc:favorite>{}</oc:favorite>
<oc:permissions>RGDNVW</oc:permissions>
<oc:size>{size}</oc:size>
</d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>"#,
        href_for(remote, false),
        remote.len(),
        favorite_of(state, remote),
    )
}

fn multistatus(xml: String) -> Response<Bytes> {
    Response::builder()
        .status(StatusCode::MULTI_STATUS)
        .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
        .body(Bytes::from(xml))
        .unwrap()
}

pub const CAPABILITIES_JSON: &str = r##"{
  "ocs": {
    "meta": {"status": "ok", "statuscode": 100, "message": "OK"},
    "data": {
      "version": {"major": 27, "minor": 1, "micro": 3, "string": "27.1.3", "edition": ""},
      "capabilities": {
        "core": {"pollinterval": 60, "webdav-root": "remote.php/webdav"},
        "files_sharing": {
          "api_enabled": true,
          "public": {"enabled": true, "password": {"enforced": false}, "expire_date": {"enabled": false}, "upload": true},
          "resharing": true,
          "federation": {"outgoing": true, "incoming": false},
          "sharebymail": {"enabled": true, "send_password_by_mail": true}
        },
        "files": {
          "bigfilechunking": true,
          "undelete": true,
          "versioning": true,
          "locking": "1.0",
          "directEditing": {"url": "https://cloud.example.com/ocs/v2.php/apps/files/api/v1/directEditing", "etag": "c748e8fc588b54fc5af38c4481a19d20"}
        },
        "activity": {"apiv2": ["filters", "previews", "rich-strings"]},
        "end-to-end-encryption": {"enabled": true, "api-version": "1.2", "keys-exist": false},
        "user_status": {"enabled": true, "supports_emoji": true},
        "groupfolders": {"hasGroupFolders": false},
        "theming": {"name": "Nextcloud", "slogan": "a safe home for all your data", "color": "#0082c9", "color-text": "#ffffff", "color-element": "#0082c9", "logo": "https://cloud.example.com/logo.svg", "background": "https://cloud.example.com/bg.jpg", "background-plain": false, "background-default": true}
      }
    }
  }
}"##;

fn capabilities(state: &State, headers: &HeaderMap) -> Response<Bytes> {
    if let (Some(etag), Some(sent)) = (
        &state.capabilities_etag,
        headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok()),
    ) {
        if etag == sent {
            return status_only(StatusCode::NOT_MODIFIED);
        }
    }

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8");
    if let Some(etag) = &state.capabilities_etag {
        builder = builder.header(header::ETAG, etag.as_str());
    }
    builder.body(Bytes::from_static(CAPABILITIES_JSON.as_bytes())).unwrap()
}
