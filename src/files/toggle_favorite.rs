use hyper::Method;

use crate::operations::operation::RemoteOperation;
use crate::operations::result::{RemoteOperationResult, ResultCode};
use crate::webdav::client::NextcloudClient;
use crate::webdav::properties::DavProperty;
use crate::webdav::types::{AuthMode, DavRequest, DavResponse};
use crate::webdav::xml::build_proppatch_body;

/// Set or clear `oc:favorite` on a file or folder.
#[derive(Debug, Clone)]
pub struct ToggleFavoriteRemoteOperation {
    make_it_favorite: bool,
    file_path: String,
}

impl ToggleFavoriteRemoteOperation {
    pub fn new(make_it_favorite: bool, file_path: impl Into<String>) -> Self {
        Self {
            make_it_favorite,
            file_path: file_path.into(),
        }
    }

    fn request(&self, client: &NextcloudClient) -> anyhow::Result<DavRequest> {
        let body = if self.make_it_favorite {
            build_proppatch_body(&[(DavProperty::Favorite, "1")], &[])
        } else {
            build_proppatch_body(&[], &[DavProperty::Favorite])
        };
        Ok(
            DavRequest::new(Method::from_bytes(b"PROPPATCH")?, client.files_dav_uri(&self.file_path))
                .xml_body(body),
        )
    }

    /// Older code path: preemptive Basic auth and the client's redirect policy.
    pub async fn run_legacy(&self, client: &NextcloudClient) -> RemoteOperationResult<()> {
        let request = match self.request(client) {
            Ok(request) => request.auth(AuthMode::Preemptive),
            Err(err) => return RemoteOperationResult::from_error(&err),
        };
        self.send(client, request).await
    }

    async fn send(&self, client: &NextcloudClient, request: DavRequest) -> RemoteOperationResult<()> {
        match client.execute(request).await {
            Ok(response) => self.interpret(&response),
            Err(err) => {
                tracing::error!("toggle favorite on {} failed: {err:#}", self.file_path);
                RemoteOperationResult::from_error(&err)
            }
        }
    }

    fn interpret(&self, response: &DavResponse) -> RemoteOperationResult<()> {
        tracing::debug!(
            "PROPPATCH favorite={} {} -> {}",
            self.make_it_favorite,
            self.file_path,
            response.status
        );
        match response.status_code() {
            200 | 207 => RemoteOperationResult::from_response(response),
            _ => {
                let code = match ResultCode::from_status(response.status, &response.headers) {
                    ResultCode::Ok => ResultCode::UnhandledHttpCode,
                    other => other,
                };
                RemoteOperationResult::failed_status(code, response)
            }
        }
    }
}

impl RemoteOperation for ToggleFavoriteRemoteOperation {
    type Output = ();

    /// Redirects are never followed; credentials are only sent when the server asks for them.
    async fn run(&self, client: &NextcloudClient) -> RemoteOperationResult<()> {
        let authenticator = match client.authenticator() {
            Ok(authenticator) => authenticator,
            Err(err) => return RemoteOperationResult::from_error(&err),
        };
        let request = match self.request(client) {
            Ok(request) => request
                .auth(AuthMode::Challenge(authenticator))
                .follow_redirects(false),
            Err(err) => return RemoteOperationResult::from_error(&err),
        };
        self.send(client, request).await
    }
}
