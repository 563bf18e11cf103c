use std::collections::HashSet;
use std::time::Duration;

use storage_contracts::StorageErrorKind;
use storage_sys::sha256_hex;
use storage_testing::{FlakyExecutorServer, StalledServer};
use storage_testing::fixtures::WINDOWS_EXECUTOR;

use crate::server;

#[tokio::test]
async fn publishes_all_platform_executors() {
    let server = server().await;
    let executors = server.client().executors().await.expect("executors");

    let names: Vec<&str> = executors.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["lsx-darwin", "lsx-linux", "lsx-windows.exe"]);
}

#[tokio::test]
async fn head_reports_distinct_checksums() {
    let server = server().await;
    let client = server.client();

    let mut checksums = HashSet::new();
    for name in ["lsx-linux", "lsx-darwin", "lsx-windows.exe"] {
        let info = client.executor_head(name).await.expect("head");
        assert_eq!(info.name, name);
        assert_eq!(info.checksum.len(), 64);
        checksums.insert(info.checksum);
    }
    assert_eq!(checksums.len(), 3);
}

#[tokio::test]
async fn get_content_matches_advertised_checksum() {
    let server = server().await;
    let client = server.client();

    let head = client
        .executor_head("lsx-windows.exe")
        .await
        .expect("head");
    let (info, content) = client
        .executor_get("lsx-windows.exe")
        .await
        .expect("get");

    assert_eq!(info, head);
    assert_eq!(content, WINDOWS_EXECUTOR);
    assert_eq!(sha256_hex(&content), info.checksum);
    assert_eq!(content.len() as u64, info.size);
}

#[tokio::test]
async fn unknown_executor_is_executor_not_found() {
    let server = server().await;
    let client = server.client();

    for name in ["lsx", "lsx-windows", "lsx-plan9"] {
        let err = client
            .executor_head(name)
            .await
            .expect_err("unknown executor");
        assert_eq!(err.kind, StorageErrorKind::ExecutorNotFound, "{name}");
        assert_eq!(err.status(), 404);

        let err = client
            .executor_get(name)
            .await
            .expect_err("unknown executor");
        assert_eq!(err.kind, StorageErrorKind::ExecutorNotFound, "{name}");
    }
}

#[tokio::test]
async fn ensure_caches_and_reuses_executor() {
    let server = server().await;
    let client = server.client();

    let path = client
        .ensure_executor_named("lsx-darwin")
        .await
        .expect("first fetch");
    let cached = std::fs::read(&path).expect("cached executor");
    let published = std::fs::read(server.executors_dir().join("lsx-darwin")).expect("published");
    assert_eq!(cached, published);

    let again = client
        .ensure_executor_named("lsx-darwin")
        .await
        .expect("second fetch");
    assert_eq!(again, path);
}

#[tokio::test]
async fn stale_cache_entry_is_replaced() {
    let server = server().await;
    let client = server.client();

    std::fs::create_dir_all(server.cache_dir()).expect("cache dir");
    std::fs::write(server.cache_dir().join("lsx-darwin"), b"stale").expect("stale entry");

    let path = client
        .ensure_executor_named("lsx-darwin")
        .await
        .expect("refresh");
    let head = client.executor_head("lsx-darwin").await.expect("head");
    let refreshed = std::fs::read(&path).expect("refreshed");
    assert_eq!(sha256_hex(&refreshed), head.checksum);
}

#[tokio::test]
async fn persistent_corruption_fails_after_one_refetch() {
    let flaky = FlakyExecutorServer::start("lsx-linux", b"#!/bin/sh\necho ok\n", usize::MAX)
        .await
        .expect("flaky server");

    let err = flaky
        .client()
        .ensure_executor_named("lsx-linux")
        .await
        .expect_err("corrupted download");
    assert_eq!(err.kind, StorageErrorKind::ChecksumMismatch);
    assert_eq!(flaky.downloads(), 2);
}

#[tokio::test]
async fn transient_corruption_recovers_on_refetch() {
    let content = b"#!/bin/sh\necho ok\n";
    let flaky = FlakyExecutorServer::start("lsx-linux", content, 1)
        .await
        .expect("flaky server");

    let path = flaky
        .client()
        .ensure_executor_named("lsx-linux")
        .await
        .expect("second download verifies");
    assert_eq!(flaky.downloads(), 2);
    assert_eq!(std::fs::read(path).expect("cached"), content);
}

#[tokio::test]
async fn concurrent_fetches_leave_one_valid_entry() {
    let server = server().await;
    let first = server.new_client("shared-cache").expect("client");
    let second = server.new_client("shared-cache").expect("client");

    let (a, b) = tokio::join!(
        first.ensure_executor_named("lsx-linux"),
        second.ensure_executor_named("lsx-linux"),
    );
    let a = a.expect("first client");
    let b = b.expect("second client");
    assert_eq!(a, b);

    let head = first.executor_head("lsx-linux").await.expect("head");
    assert_eq!(sha256_hex(&std::fs::read(&a).expect("cached")), head.checksum);
}

#[tokio::test]
async fn unresponsive_service_times_out() {
    let stalled = StalledServer::start(Duration::from_millis(300))
        .await
        .expect("stalled server");
    let client = stalled.client();

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        client.ensure_executor_named("lsx-linux"),
    )
    .await
    .expect("client gave up on its own");
    let err = outcome.expect_err("no response");
    assert_eq!(err.kind, StorageErrorKind::Timeout);
    assert_eq!(err.status(), 504);

    let err = tokio::time::timeout(Duration::from_secs(10), client.executor_get("lsx-linux"))
        .await
        .expect("client gave up on its own")
        .expect_err("no response");
    assert_eq!(err.kind, StorageErrorKind::Timeout);
}
