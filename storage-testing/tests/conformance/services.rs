use storage_contracts::StorageErrorKind;
use storage_testing::fixtures::SERVICE_NAMES;

use crate::server;

#[tokio::test]
async fn lists_every_configured_service() {
    let server = server().await;
    let services = server.client().services().await.expect("services");

    assert_eq!(services.len(), 3);
    let names: Vec<&str> = services.keys().map(String::as_str).collect();
    assert_eq!(names, SERVICE_NAMES);
    for (name, info) in &services {
        assert_eq!(&info.name, name);
        assert_eq!(info.driver.name, "mock");
    }
}

#[tokio::test]
async fn inspect_inherited_service() {
    let server = server().await;
    let info = server
        .client()
        .service_inspect("mock2")
        .await
        .expect("inspect mock2");

    assert_eq!(info.name, "mock2");
    assert_eq!(info.driver.name, "mock");
    assert!(!info.driver.next_device.ignore);
    assert_eq!(info.driver.next_device.prefix, "xvd");
    assert_eq!(info.driver.next_device.pattern, r"\w");
}

#[tokio::test]
async fn inspect_unknown_service_is_not_found() {
    let server = server().await;
    let err = server
        .client()
        .service_inspect("nope")
        .await
        .expect_err("unknown service");

    assert_eq!(err.kind, StorageErrorKind::NotFound);
    assert_eq!(err.status(), 404);
    assert_eq!(err.message, "resource not found");
}
