//! Conformance tests driven through the client SDK against a live server

mod executors;
mod local;
mod services;
mod snapshots;
mod volumes;

use storage_testing::TestServer;

pub async fn server() -> TestServer {
    TestServer::start().await.expect("start test server")
}
