use storage_contracts::{RESOURCE_NOT_FOUND, StorageErrorKind};
use storage_types::{OptValue, Opts, SnapshotCopyRequest, VolumeCreateRequest};

use crate::server;

fn owner_opts() -> Opts {
    Opts::from([
        ("priority".to_string(), OptValue::from(2)),
        ("owner".to_string(), OptValue::from("root@example.com")),
    ])
}

#[tokio::test]
async fn every_service_has_three_snapshots() {
    let server = server().await;
    let snapshots = server.client().snapshots().await.expect("snapshots");

    assert_eq!(snapshots.len(), 3);
    for (service, list) in &snapshots {
        let ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["snap-000", "snap-001", "snap-002"], "{service}");
    }
}

#[tokio::test]
async fn scoped_listing_returns_that_service_only() {
    let server = server().await;
    let snapshots = server
        .client()
        .snapshots_by_service("mock")
        .await
        .expect("snapshots");

    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].id, "snap-000");
    assert_eq!(snapshots[0].name, "Snapshot 0");
}

#[tokio::test]
async fn inspect_fixture_snapshot() {
    let server = server().await;
    let snapshot = server
        .client()
        .snapshot_inspect("mock", "snap-000")
        .await
        .expect("snap-000");

    assert_eq!(snapshot.id, "snap-000");
    assert_eq!(snapshot.name, "Snapshot 0");
    assert_eq!(snapshot.volume_id, "vol-000");
    assert_eq!(snapshot.volume_size, 100);
}

#[tokio::test]
async fn volume_from_snapshot() {
    let server = server().await;
    let mut request = VolumeCreateRequest {
        name: "restored".to_string(),
        ..Default::default()
    };
    request
        .opts
        .insert("source".to_string(), OptValue::from("snap-001"));

    let volume = server
        .client()
        .snapshot_create("mock", "snap-001", &request)
        .await
        .expect("volume from snapshot");

    assert_eq!(volume.name, "restored");
    assert_eq!(volume.size, 100);
    assert_eq!(volume.opts, request.opts);
}

#[tokio::test]
async fn copy_then_remove() {
    let server = server().await;
    let client = server.client();

    let copy = client
        .snapshot_copy(
            "mock3",
            "snap-002",
            &SnapshotCopyRequest {
                snapshot_name: "offsite".to_string(),
                opts: owner_opts(),
            },
        )
        .await
        .expect("copy");
    assert_eq!(copy.name, "offsite");
    assert_eq!(copy.volume_id, "vol-002");
    assert_eq!(copy.opts["priority"], OptValue::from(2));
    assert_eq!(copy.opts["owner"].as_str(), Some("root@example.com"));

    let source = client
        .snapshot_inspect("mock3", "snap-002")
        .await
        .expect("source");
    assert_eq!(source.name, "Snapshot 2");
    assert!(source.opts.is_empty());

    client
        .snapshot_remove("mock3", &copy.id)
        .await
        .expect("remove copy");
    let err = client
        .snapshot_inspect("mock3", &copy.id)
        .await
        .expect_err("copy is gone");
    assert_eq!(err.kind, StorageErrorKind::NotFound);
}

#[tokio::test]
async fn snapshot_survives_volume_removal() {
    let server = server().await;
    let client = server.client();

    client
        .volume_remove("mock", "vol-000")
        .await
        .expect("remove volume");
    let snapshot = client
        .snapshot_inspect("mock", "snap-000")
        .await
        .expect("snapshot still present");
    assert_eq!(snapshot.volume_id, "vol-000");
}

#[tokio::test]
async fn snapshot_remove_is_not_idempotent() {
    let server = server().await;
    let client = server.client();

    client
        .snapshot_remove("mock2", "snap-001")
        .await
        .expect("first remove");

    let err = client
        .snapshot_remove("mock2", "snap-001")
        .await
        .expect_err("second remove");
    assert_eq!(err.kind, StorageErrorKind::NotFound);
    assert_eq!(err.status(), 404);
    assert_eq!(err.message, RESOURCE_NOT_FOUND);
}
