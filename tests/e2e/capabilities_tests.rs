use crate::util::live_client;
use nc_dav_rs::{GetCapabilitiesRemoteOperation, OwnCloudVersion, RemoteOperation};

#[tokio::test]
async fn test_get_capabilities() {
    let Some(client) = live_client() else {
        return;
    };

    let result = GetCapabilitiesRemoteOperation::new().run(&client).await;
    assert!(result.is_success(), "{result}");
    let capability = result.into_data().unwrap();

    assert!(!capability.etag.is_empty());
    assert!(capability.files_sharing_api_enabled.is_true());
    assert!(capability.version.major() > 0);
}

#[tokio::test]
async fn test_get_capabilities_with_etag() {
    let Some(client) = live_client() else {
        return;
    };

    let first = GetCapabilitiesRemoteOperation::new()
        .run(&client)
        .await
        .into_data()
        .expect("capabilities");
    let second = GetCapabilitiesRemoteOperation::with_current(first.clone())
        .run(&client)
        .await;
    assert!(second.is_success(), "{second}");
    let same = second.into_data().unwrap();

    if first.version.is_newer_or_equal(&OwnCloudVersion::nextcloud_19()) {
        assert_eq!(first, same);
    } else {
        assert_eq!(first.etag, same.etag);
    }
}
