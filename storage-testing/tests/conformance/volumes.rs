use storage_contracts::StorageErrorKind;
use storage_types::{OptValue, Opts, VolumeCreateRequest, VolumeSnapshotRequest, VolumesOpts};

use crate::server;

fn ids(volumes: &[storage_types::Volume]) -> Vec<&str> {
    volumes.iter().map(|volume| volume.id.as_str()).collect()
}

#[tokio::test]
async fn listing_is_sorted_by_id() {
    let server = server().await;
    let volumes = server
        .client()
        .volumes_by_service("mock")
        .await
        .expect("volumes");

    assert_eq!(ids(&volumes), vec!["vol-000", "vol-001", "vol-002"]);
    assert_eq!(volumes[0].name, "Volume 0");
    assert_eq!(volumes[0].availability_zone, "zone-000");
}

#[tokio::test]
async fn listing_twice_is_identical() {
    let server = server().await;
    let first = server.client().volumes().await.expect("first listing");
    let second = server.client().volumes().await.expect("second listing");

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn attachments_are_opt_in() {
    let server = server().await;
    let client = server.client();

    let plain = client
        .volume_inspect("mock", "vol-000", VolumesOpts::default())
        .await
        .expect("inspect");
    assert!(plain.attachments.is_empty());

    let attached = client
        .volumes_by_service_with("mock", VolumesOpts { attachments: true })
        .await
        .expect("volumes with attachments");
    let vol = attached
        .iter()
        .find(|volume| volume.id == "vol-000")
        .expect("vol-000");
    assert_eq!(vol.attachments.len(), 1);
    assert_eq!(vol.attachments[0].device_name, "/dev/xvda");
}

#[tokio::test]
async fn create_preserves_opts_verbatim() {
    let server = server().await;
    let client = server.client();

    let mut opts = Opts::new();
    opts.insert("encrypted".to_string(), OptValue::from(true));
    opts.insert("priority".to_string(), OptValue::from(7));
    opts.insert(
        "tags".to_string(),
        OptValue::from(vec![OptValue::from("a"), OptValue::from("b")]),
    );

    let request = VolumeCreateRequest {
        name: "data".to_string(),
        size: Some(20),
        volume_type: Some("silver".to_string()),
        opts: opts.clone(),
        ..Default::default()
    };
    let created = client
        .volume_create("mock2", &request)
        .await
        .expect("create");
    assert_eq!(created.id, "vol-003");
    assert_eq!(created.opts, opts);

    let inspected = client
        .volume_inspect("mock2", &created.id, VolumesOpts::default())
        .await
        .expect("inspect");
    assert_eq!(inspected, created);

    let others = client
        .volumes_by_service("mock3")
        .await
        .expect("mock3 volumes");
    assert_eq!(others.len(), 3, "services must not share state");
}

#[tokio::test]
async fn create_echoes_requested_fields() {
    let server = server().await;

    let mut opts = Opts::new();
    opts.insert("priority".to_string(), OptValue::from(2));
    opts.insert("owner".to_string(), OptValue::from("root@example.com"));
    let request = VolumeCreateRequest {
        name: "Volume 001".to_string(),
        availability_zone: Some("US".to_string()),
        iops: Some(1000),
        size: Some(10240),
        volume_type: Some("myType".to_string()),
        opts,
    };

    let volume = server
        .client()
        .volume_create("mock", &request)
        .await
        .expect("create");
    assert_eq!(volume.name, "Volume 001");
    assert_eq!(volume.availability_zone, "US");
    assert_eq!(volume.iops, 1000);
    assert_eq!(volume.size, 10240);
    assert_eq!(volume.volume_type, "myType");
    assert_eq!(volume.opts["priority"], OptValue::from(2));
    assert_eq!(volume.opts["owner"], OptValue::from("root@example.com"));
}

#[tokio::test]
async fn remove_is_not_idempotent() {
    let server = server().await;
    let client = server.client();

    client
        .volume_remove("mock", "vol-000")
        .await
        .expect("first remove");

    let err = client
        .volume_remove("mock", "vol-000")
        .await
        .expect_err("second remove");
    assert_eq!(err.kind, StorageErrorKind::NotFound);
    assert_eq!(err.status(), 404);
    assert_eq!(err.message, "resource not found");

    let remaining = client.volumes_by_service("mock").await.expect("volumes");
    assert_eq!(ids(&remaining), vec!["vol-001", "vol-002"]);
}

#[tokio::test]
async fn invalid_create_is_rejected() {
    let server = server().await;
    let err = server
        .client()
        .volume_create(
            "mock",
            &VolumeCreateRequest {
                name: "bad".to_string(),
                size: Some(-1),
                ..Default::default()
            },
        )
        .await
        .expect_err("negative size");
    assert_eq!(err.kind, StorageErrorKind::InvalidInput);
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn snapshot_of_volume_references_it() {
    let server = server().await;
    let snapshot = server
        .client()
        .volume_snapshot(
            "mock",
            "vol-001",
            &VolumeSnapshotRequest {
                snapshot_name: "nightly".to_string(),
                opts: Opts::from([
                    ("priority".to_string(), OptValue::from(2)),
                    ("owner".to_string(), OptValue::from("root@example.com")),
                ]),
            },
        )
        .await
        .expect("snapshot");

    assert_eq!(snapshot.name, "nightly");
    assert_eq!(snapshot.volume_id, "vol-001");
    assert_eq!(snapshot.volume_size, 100);
    assert_eq!(snapshot.opts["priority"], OptValue::from(2));
    assert_eq!(snapshot.opts["owner"].as_str(), Some("root@example.com"));
}

#[tokio::test]
async fn unknown_volume_is_not_found() {
    let server = server().await;
    let err = server
        .client()
        .volume_inspect("mock", "vol-999", VolumesOpts::default())
        .await
        .expect_err("missing volume");
    assert_eq!(err.kind, StorageErrorKind::NotFound);
}
