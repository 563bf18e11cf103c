//! Executor-backed queries; these run the fixture shell script

use storage_contracts::StorageErrorKind;

use crate::server;

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[tokio::test]
async fn instance_id_comes_from_executor() {
    let server = server().await;
    let instance = server
        .client()
        .instance_id("mock")
        .await
        .expect("instance id");

    assert_eq!(instance, storage_executor::mock::instance_id());
    assert_eq!(instance.id, "mock-instance-000");
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[tokio::test]
async fn local_devices_map_attached_volume() {
    let server = server().await;
    let devices = server
        .client()
        .local_devices("mock2")
        .await
        .expect("local devices");

    assert_eq!(devices.driver, "mock");
    assert_eq!(
        devices.device_map.get("/dev/xvda").map(String::as_str),
        Some("vol-000")
    );
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[tokio::test]
async fn next_device_skips_attached_device() {
    let server = server().await;
    let device = server
        .client()
        .next_device("mock")
        .await
        .expect("next device");
    assert_eq!(device.as_deref(), Some("/dev/xvdb"));
}

#[tokio::test]
async fn executor_queries_for_unknown_service_fail_first() {
    let server = server().await;
    let err = server
        .client()
        .instance_id("nope")
        .await
        .expect_err("unknown service");
    assert_eq!(err.kind, StorageErrorKind::NotFound);
}
