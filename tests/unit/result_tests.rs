use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use nc_dav_rs::{DavError, DavResponse, RemoteOperationResult, ResultCode};

fn response(status: u16) -> DavResponse {
    DavResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body: Bytes::new(),
    }
}

#[test]
fn test_status_mapping() {
    let cases = [
        (200, ResultCode::Ok),
        (201, ResultCode::Ok),
        (207, ResultCode::Ok),
        (401, ResultCode::Unauthorized),
        (403, ResultCode::Forbidden),
        (404, ResultCode::FileNotFound),
        (409, ResultCode::Conflict),
        (423, ResultCode::LockFailed),
        (500, ResultCode::InstanceNotConfigured),
        (503, ResultCode::ServiceUnavailable),
        (507, ResultCode::QuotaExceeded),
        (418, ResultCode::UnhandledHttpCode),
        (302, ResultCode::UnhandledHttpCode),
    ];
    for (status, expected) in cases {
        let result = RemoteOperationResult::<()>::from_response(&response(status));
        assert_eq!(result.code(), expected, "status {status}");
        assert_eq!(result.http_code(), Some(status));
        assert_eq!(result.is_success(), expected == ResultCode::Ok);
    }
}

#[test]
fn test_maintenance_mode() {
    let mut resp = response(503);
    resp.headers
        .insert("x-nextcloud-maintenance-mode", "1".parse().unwrap());
    let result = RemoteOperationResult::<()>::from_response(&resp);
    assert_eq!(result.code(), ResultCode::MaintenanceMode);
    assert!(!result.is_success());
}

#[test]
fn test_errors_map_to_codes() {
    let cases: Vec<(anyhow::Error, ResultCode)> = vec![
        (
            DavError::Timeout {
                url: "u".into(),
                secs: 1,
            }
            .into(),
            ResultCode::Timeout,
        ),
        (
            DavError::Connection {
                url: "u".into(),
                reason: "refused".into(),
            }
            .into(),
            ResultCode::HostNotAvailable,
        ),
        (
            DavError::InvalidUrl {
                url: "u".into(),
                reason: "bad".into(),
            }
            .into(),
            ResultCode::IncorrectAddress,
        ),
        (DavError::Xml("eof".into()).into(), ResultCode::InvalidResponse),
        (DavError::TooManyRedirects(5).into(), ResultCode::InvalidResponse),
        (anyhow::anyhow!("something else"), ResultCode::UnknownError),
    ];
    for (error, expected) in cases {
        let result = RemoteOperationResult::<()>::from_error(&error);
        assert_eq!(result.code(), expected);
        assert!(!result.is_success());
        assert_eq!(result.http_code(), None);
        assert!(!result.log_message().is_empty());
    }
}

#[test]
fn test_context_does_not_hide_the_cause() {
    let error = anyhow::Error::from(DavError::Timeout {
        url: "u".into(),
        secs: 3,
    })
    .context("reading folder");
    let result = RemoteOperationResult::<()>::from_error(&error);
    assert_eq!(result.code(), ResultCode::Timeout);
    assert!(result.log_message().contains("reading folder"));
}

#[test]
fn test_payload_and_cast() {
    let result = RemoteOperationResult::from_code(ResultCode::Ok).with_data(vec![1, 2, 3]);
    assert!(result.is_success());
    assert_eq!(result.data(), Some(&vec![1, 2, 3]));

    let cast: RemoteOperationResult<String> = result.cast();
    assert!(cast.is_success());
    assert!(cast.data().is_none());
}
