use crate::files::mapper::{ReadMode, WebDavFileUtils};
use crate::files::model::RemoteFile;
use crate::files::read_folder::entries_of;
use crate::operations::operation::RemoteOperation;
use crate::operations::result::{RemoteOperationResult, ResultCode};
use crate::webdav::client::NextcloudClient;
use crate::webdav::properties::ALL_PROPERTIES;
use crate::webdav::types::Depth;

/// `PROPFIND Depth: 0` on a single file or folder.
#[derive(Debug, Clone)]
pub struct ReadFileRemoteOperation {
    remote_path: String,
}

impl ReadFileRemoteOperation {
    pub fn new(remote_path: impl Into<String>) -> Self {
        Self {
            remote_path: remote_path.into(),
        }
    }
}

impl RemoteOperation for ReadFileRemoteOperation {
    type Output = RemoteFile;

    async fn run(&self, client: &NextcloudClient) -> RemoteOperationResult<RemoteFile> {
        let url = client.files_dav_uri(&self.remote_path);
        let response = match client.propfind(&url, Depth::Zero, ALL_PROPERTIES).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("read file {} failed: {err:#}", self.remote_path);
                return RemoteOperationResult::from_error(&err);
            }
        };

        let entries = match entries_of(&response) {
            Ok(entries) => entries,
            Err(failure) => return failure.cast(),
        };

        match WebDavFileUtils::read_data(&entries, &client.files_dav_path(), ReadMode::Full)
            .into_iter()
            .next()
        {
            Some(file) => RemoteOperationResult::from_response(&response).with_data(file),
            None => RemoteOperationResult::from_code(ResultCode::FileNotFound)
                .with_message(format!("no entry for {}", self.remote_path)),
        }
    }
}
