use std::future::Future;

use crate::operations::result::RemoteOperationResult;
use crate::webdav::client::NextcloudClient;

/// A request/response unit run against a client.
///
/// Implementations hold only their parameters, so one value can be run any number of times.
pub trait RemoteOperation {
    type Output;

    fn run(
        &self,
        client: &NextcloudClient,
    ) -> impl Future<Output = RemoteOperationResult<Self::Output>> + Send;
}
