use crate::files::mapper::{ReadMode, WebDavFileUtils, remote_path_of};
use crate::files::model::RemoteFile;
use crate::files::utils::with_trailing_slash;
use crate::operations::operation::RemoteOperation;
use crate::operations::result::{RemoteOperationResult, ResultCode};
use crate::webdav::client::NextcloudClient;
use crate::webdav::properties::ALL_PROPERTIES;
use crate::webdav::streaming::parse_multistatus_bytes;
use crate::webdav::types::{DavEntry, DavResponse, Depth};

/// A folder split into itself and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropFindResult {
    pub root: Option<RemoteFile>,
    pub children: Vec<RemoteFile>,
}

/// `PROPFIND Depth: 1` on a folder.
///
/// The payload is the folder followed by its direct children, in server order.
#[derive(Debug, Clone)]
pub struct ReadFolderRemoteOperation {
    remote_path: String,
}

impl ReadFolderRemoteOperation {
    pub fn new(remote_path: impl Into<String>) -> Self {
        Self {
            remote_path: remote_path.into(),
        }
    }

    async fn fetch(&self, client: &NextcloudClient) -> Result<Vec<DavEntry>, RemoteOperationResult<()>> {
        let url = client.files_dav_uri(&self.remote_path);
        let response = match client.propfind(&url, Depth::One, ALL_PROPERTIES).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("read folder {} failed: {err:#}", self.remote_path);
                return Err(RemoteOperationResult::from_error(&err));
            }
        };
        entries_of(&response)
    }

    /// Same request as [`RemoteOperation::run`], with the folder told apart from its members
    /// by path instead of by position.
    pub async fn list_folder(&self, client: &NextcloudClient) -> RemoteOperationResult<PropFindResult> {
        let entries = match self.fetch(client).await {
            Ok(entries) => entries,
            Err(failure) => return failure.cast(),
        };

        let files_dav_path = client.files_dav_path();
        let own_path = with_trailing_slash(&remote_path_of(
            &client.files_dav_uri(&self.remote_path),
            &files_dav_path,
        ));

        let mut result = PropFindResult::default();
        for entry in &entries {
            let file = WebDavFileUtils::parse_response(entry, &files_dav_path);
            if with_trailing_slash(&file.remote_path) == own_path && result.root.is_none() {
                result.root = Some(file);
            } else {
                result.children.push(file);
            }
        }

        RemoteOperationResult::from_code(ResultCode::Ok).with_data(result)
    }
}

impl RemoteOperation for ReadFolderRemoteOperation {
    type Output = Vec<RemoteFile>;

    async fn run(&self, client: &NextcloudClient) -> RemoteOperationResult<Vec<RemoteFile>> {
        let entries = match self.fetch(client).await {
            Ok(entries) => entries,
            Err(failure) => return failure.cast(),
        };
        let files = WebDavFileUtils::read_data(&entries, &client.files_dav_path(), ReadMode::Full);
        tracing::debug!("read folder {}: {} entries", self.remote_path, files.len());
        RemoteOperationResult::from_code(ResultCode::Ok).with_data(files)
    }
}

/// Parse a `207` body, or turn any other status into a failure result.
pub(crate) fn entries_of(response: &DavResponse) -> Result<Vec<DavEntry>, RemoteOperationResult<()>> {
    if response.status_code() != 207 {
        let code = match ResultCode::from_status(response.status, &response.headers) {
            ResultCode::Ok => ResultCode::UnhandledHttpCode,
            other => other,
        };
        return Err(RemoteOperationResult::failed_status(code, response));
    }
    parse_multistatus_bytes(&response.body).map_err(|err| {
        tracing::error!("unreadable multistatus: {err:#}");
        RemoteOperationResult::from_error(&err)
    })
}
