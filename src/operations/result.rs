use hyper::{HeaderMap, StatusCode};
use std::fmt;

use crate::common::error::DavError;
use crate::webdav::types::DavResponse;

const MAINTENANCE_HEADER: &str = "x-nextcloud-maintenance-mode";

/// Outcome category of a remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Ok,
    Unauthorized,
    Forbidden,
    FileNotFound,
    Conflict,
    LockFailed,
    FolderAlreadyExists,
    InstanceNotConfigured,
    ServiceUnavailable,
    MaintenanceMode,
    QuotaExceeded,
    UnhandledHttpCode,
    Timeout,
    HostNotAvailable,
    IncorrectAddress,
    InvalidResponse,
    UnknownError,
}

impl ResultCode {
    /// Result code for a final HTTP status.
    pub fn from_status(status: StatusCode, headers: &HeaderMap) -> Self {
        if status.is_success() {
            return ResultCode::Ok;
        }
        match status.as_u16() {
            401 => ResultCode::Unauthorized,
            403 => ResultCode::Forbidden,
            404 => ResultCode::FileNotFound,
            409 => ResultCode::Conflict,
            423 => ResultCode::LockFailed,
            500 => ResultCode::InstanceNotConfigured,
            503 if headers.contains_key(MAINTENANCE_HEADER) => ResultCode::MaintenanceMode,
            503 => ResultCode::ServiceUnavailable,
            507 => ResultCode::QuotaExceeded,
            _ => ResultCode::UnhandledHttpCode,
        }
    }
}

/// Uniform result of one operation invocation.
///
/// Never an `Err`: transport failures are folded in through [`RemoteOperationResult::from_error`].
#[derive(Debug, Clone)]
pub struct RemoteOperationResult<T> {
    code: ResultCode,
    success: bool,
    http_code: Option<u16>,
    headers: HeaderMap,
    data: Option<T>,
    log_message: String,
}

impl<T> RemoteOperationResult<T> {
    pub fn from_code(code: ResultCode) -> Self {
        Self {
            code,
            success: code == ResultCode::Ok,
            http_code: None,
            headers: HeaderMap::new(),
            data: None,
            log_message: format!("{code:?}"),
        }
    }

    /// Result following the status of `response`; the status and headers are kept.
    pub fn from_response(response: &DavResponse) -> Self {
        Self::from_status(response.status, &response.headers)
    }

    pub fn from_status(status: StatusCode, headers: &HeaderMap) -> Self {
        let code = ResultCode::from_status(status, headers);
        Self {
            code,
            success: code == ResultCode::Ok,
            http_code: Some(status.as_u16()),
            headers: headers.clone(),
            data: None,
            log_message: format!("{code:?} (HTTP {status})"),
        }
    }

    /// Failure for a status the operation itself decided on, e.g. an unexpected `201`.
    pub fn failed_status(code: ResultCode, response: &DavResponse) -> Self {
        Self {
            code,
            success: false,
            http_code: Some(response.status_code()),
            headers: response.headers.clone(),
            data: None,
            log_message: format!("{code:?} (HTTP {})", response.status),
        }
    }

    /// Failure for an error raised before a final response arrived.
    pub fn from_error(error: &anyhow::Error) -> Self {
        let code = match error.downcast_ref::<DavError>() {
            Some(DavError::Timeout { .. }) => ResultCode::Timeout,
            Some(DavError::Connection { .. }) => ResultCode::HostNotAvailable,
            Some(DavError::InvalidUrl { .. }) => ResultCode::IncorrectAddress,
            Some(
                DavError::Xml(_)
                | DavError::Json(_)
                | DavError::Ocs { .. }
                | DavError::TooManyRedirects(_)
                | DavError::BrokenRedirect(_),
            ) => ResultCode::InvalidResponse,
            Some(DavError::MissingConfig(_)) | None => ResultCode::UnknownError,
        };
        Self {
            code,
            success: false,
            http_code: None,
            headers: HeaderMap::new(),
            data: None,
            log_message: format!("{error:#}"),
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.log_message = message.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn code(&self) -> ResultCode {
        self.code
    }

    pub fn http_code(&self) -> Option<u16> {
        self.http_code
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn log_message(&self) -> &str {
        &self.log_message
    }

    /// Same outcome with a different payload type and no payload.
    pub fn cast<U>(self) -> RemoteOperationResult<U> {
        RemoteOperationResult {
            code: self.code,
            success: self.success,
            http_code: self.http_code,
            headers: self.headers,
            data: None,
            log_message: self.log_message,
        }
    }
}

impl<T> fmt::Display for RemoteOperationResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log_message)
    }
}
