use hyper::Method;
use hyper::header::{self, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};

use crate::operations::operation::RemoteOperation;
use crate::operations::result::{RemoteOperationResult, ResultCode};
use crate::status::capability::OCCapability;
use crate::webdav::client::NextcloudClient;
use crate::webdav::types::{DavRequest, DavResponse};

const CAPABILITIES_ENDPOINT: &str = "cloud/capabilities?format=json";
const OCS_API_HEADER: &str = "ocs-apirequest";

/// Fetch the server capabilities.
///
/// With a current capability the request is conditional, and a `304` hands the
/// current capability back unchanged.
#[derive(Debug, Clone, Default)]
pub struct GetCapabilitiesRemoteOperation {
    current: Option<OCCapability>,
}

impl GetCapabilitiesRemoteOperation {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn with_current(current: OCCapability) -> Self {
        Self {
            current: Some(current),
        }
    }

    fn request(&self, client: &NextcloudClient) -> anyhow::Result<DavRequest> {
        let mut request = DavRequest::new(Method::GET, client.ocs_uri(CAPABILITIES_ENDPOINT))
            .header(
                HeaderName::from_static(OCS_API_HEADER),
                HeaderValue::from_static("true"),
            )
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(current) = self.current.as_ref().filter(|c| !c.etag.is_empty()) {
            request = request.header(header::IF_NONE_MATCH, HeaderValue::from_str(&current.etag)?);
        }
        Ok(request)
    }

    fn interpret(&self, response: &DavResponse) -> RemoteOperationResult<OCCapability> {
        if response.status_code() == 304 {
            // only a conditional request may be answered with the current capability
            if let Some(current) = self.current.as_ref().filter(|c| !c.etag.is_empty()) {
                tracing::debug!("capabilities unchanged (etag {})", current.etag);
                return RemoteOperationResult::from_code(ResultCode::Ok).with_data(current.clone());
            }
        }

        if response.status_code() != 200 {
            let code = match ResultCode::from_status(response.status, &response.headers) {
                ResultCode::Ok => ResultCode::UnhandledHttpCode,
                other => other,
            };
            return RemoteOperationResult::failed_status(code, response);
        }

        match OCCapability::from_json(&response.body) {
            Ok(mut capability) => {
                capability.etag = match response.header(header::ETAG.as_str()) {
                    Some(etag) if !etag.trim().is_empty() => etag.trim().to_string(),
                    _ => format!("{:x}", Sha256::digest(&response.body)),
                };
                tracing::debug!("capabilities of {} (etag {})", capability.version, capability.etag);
                RemoteOperationResult::from_response(response).with_data(capability)
            }
            Err(err) => {
                tracing::error!("unreadable capabilities: {err:#}");
                RemoteOperationResult::from_error(&err)
            }
        }
    }
}

impl RemoteOperation for GetCapabilitiesRemoteOperation {
    type Output = OCCapability;

    async fn run(&self, client: &NextcloudClient) -> RemoteOperationResult<OCCapability> {
        let request = match self.request(client) {
            Ok(request) => request,
            Err(err) => return RemoteOperationResult::from_error(&err),
        };
        match client.execute(request).await {
            Ok(response) => self.interpret(&response),
            Err(err) => {
                tracing::error!("get capabilities failed: {err:#}");
                RemoteOperationResult::from_error(&err)
            }
        }
    }
}
