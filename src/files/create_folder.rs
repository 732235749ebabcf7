use futures::FutureExt;
use futures::future::BoxFuture;
use hyper::Method;
use hyper::header::{HeaderName, HeaderValue};

use crate::files::utils::get_parent_path;
use crate::operations::operation::RemoteOperation;
use crate::operations::result::{RemoteOperationResult, ResultCode};
use crate::webdav::client::NextcloudClient;
use crate::webdav::types::DavRequest;

pub const OC_FILE_ID_HEADER: &str = "oc-fileid";
pub const E2E_TOKEN_HEADER: &str = "e2e-token";

/// `MKCOL` a folder, optionally creating missing ancestors first.
///
/// The payload is the `OC-FileId` header of the creating response, when sent.
#[derive(Debug, Clone)]
pub struct CreateFolderRemoteOperation {
    remote_path: String,
    create_full_path: bool,
    token: Option<String>,
}

impl CreateFolderRemoteOperation {
    pub fn new(remote_path: impl Into<String>, create_full_path: bool) -> Self {
        Self {
            remote_path: remote_path.into(),
            create_full_path,
            token: None,
        }
    }

    /// Send `token` as `E2E-Token`, needed inside end-to-end encrypted folders.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    fn create<'a>(
        &'a self,
        client: &'a NextcloudClient,
    ) -> BoxFuture<'a, RemoteOperationResult<Option<String>>> {
        async move {
            let result = self.mkcol(client).await;
            if result.code() != ResultCode::Conflict
                || !self.create_full_path
                || self.remote_path.trim_end_matches('/').is_empty()
            {
                return result;
            }

            let parent = Self {
                remote_path: get_parent_path(&self.remote_path),
                create_full_path: true,
                token: self.token.clone(),
            };
            tracing::debug!(
                "{} conflicts, creating parent {} first",
                self.remote_path,
                parent.remote_path
            );
            let parent_result = parent.create(client).await;
            if !parent_result.is_success() && parent_result.code() != ResultCode::FolderAlreadyExists
            {
                return parent_result.cast();
            }

            self.mkcol(client).await
        }
        .boxed()
    }

    async fn mkcol(&self, client: &NextcloudClient) -> RemoteOperationResult<Option<String>> {
        let url = client.files_dav_uri(&self.remote_path);

        let mut request = match Method::from_bytes(b"MKCOL") {
            Ok(method) => DavRequest::new(method, url),
            Err(err) => return RemoteOperationResult::from_error(&err.into()),
        };
        if let Some(token) = &self.token {
            match HeaderValue::from_str(token) {
                Ok(value) => {
                    request = request.header(HeaderName::from_static(E2E_TOKEN_HEADER), value);
                }
                Err(err) => return RemoteOperationResult::from_error(&err.into()),
            }
        }

        match client.execute(request).await {
            Ok(response) if response.status_code() == 405 => {
                RemoteOperationResult::failed_status(ResultCode::FolderAlreadyExists, &response)
            }
            Ok(response) => {
                let file_id = response.header(OC_FILE_ID_HEADER).map(str::to_string);
                tracing::debug!("MKCOL {} -> {}", self.remote_path, response.status);
                RemoteOperationResult::from_response(&response).with_data(file_id)
            }
            Err(err) => {
                tracing::error!("create folder {} failed: {err:#}", self.remote_path);
                RemoteOperationResult::from_error(&err)
            }
        }
    }
}

impl RemoteOperation for CreateFolderRemoteOperation {
    type Output = Option<String>;

    async fn run(&self, client: &NextcloudClient) -> RemoteOperationResult<Option<String>> {
        self.create(client).await
    }
}
