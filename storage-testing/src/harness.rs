use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use storage_contracts::{
    ClientConfig, EXECUTOR_CHECKSUM_HEADER, EXECUTOR_SIZE_HEADER, StorageClient,
};
use storage_service::{AppState, DriverRegistry, StorageConfig};
use storage_sys::sha256_hex;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::errors::{Result, TestingError};
use crate::fixtures;

fn startup_failed(reason: impl std::fmt::Display) -> TestingError {
    TestingError::ServiceStartupFailed {
        reason: reason.to_string(),
    }
}

async fn bind_ephemeral() -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(startup_failed)?;
    let addr = listener.local_addr().map_err(startup_failed)?;
    Ok((listener, addr))
}

fn client_for(addr: SocketAddr, cache_dir: &Path) -> Result<StorageClient> {
    let config = ClientConfig::new(format!("http://{addr}")).with_executor_dir(cache_dir);
    Ok(StorageClient::new(config)?)
}

/// A storage service on an ephemeral port with fixture executors published
pub struct TestServer {
    addr: SocketAddr,
    dir: TempDir,
    client: StorageClient,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let dir = tempfile::tempdir().map_err(startup_failed)?;
        let executors_dir = dir.path().join("executors");
        fixtures::write_executors(&executors_dir)?;

        let config = StorageConfig::from_yaml(&fixtures::config_yaml(&executors_dir))
            .map_err(startup_failed)?;
        let state = AppState::build(&config, &DriverRegistry::builtin())
            .await
            .map_err(startup_failed)?;

        let (listener, addr) = bind_ephemeral().await?;
        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = signal.await;
            };
            if let Err(e) = storage_service::serve(listener, state, shutdown).await {
                tracing::error!("test server exited: {}", e);
            }
        });

        let client = client_for(addr, &dir.path().join("cache"))?;
        Ok(Self {
            addr,
            dir,
            client,
            shutdown: Some(shutdown),
        })
    }

    pub fn client(&self) -> &StorageClient {
        &self.client
    }

    /// Another client against the same server with its own executor cache
    pub fn new_client(&self, cache_name: &str) -> Result<StorageClient> {
        client_for(self.addr, &self.dir.path().join(cache_name))
    }

    pub fn executors_dir(&self) -> PathBuf {
        self.dir.path().join("executors")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[derive(Clone)]
struct FlakyState {
    name: String,
    good: Arc<Vec<u8>>,
    corrupt_downloads: usize,
    downloads: Arc<AtomicUsize>,
}

impl FlakyState {
    fn headers(&self) -> [(&'static str, String); 2] {
        [
            (EXECUTOR_SIZE_HEADER, self.good.len().to_string()),
            (EXECUTOR_CHECKSUM_HEADER, sha256_hex(&self.good)),
        ]
    }
}

/// Executor endpoint that advertises one checksum but serves corrupted
/// content for the first `corrupt_downloads` GETs.
pub struct FlakyExecutorServer {
    downloads: Arc<AtomicUsize>,
    _cache: TempDir,
    client: StorageClient,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FlakyExecutorServer {
    pub async fn start(name: &str, content: &[u8], corrupt_downloads: usize) -> Result<Self> {
        let downloads = Arc::new(AtomicUsize::new(0));
        let state = FlakyState {
            name: name.to_string(),
            good: Arc::new(content.to_vec()),
            corrupt_downloads,
            downloads: downloads.clone(),
        };

        let app = Router::new()
            .route("/executors/{name}", get(flaky_get).head(flaky_head))
            .with_state(state);

        let (listener, addr) = bind_ephemeral().await?;
        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await;
        });

        let cache = tempfile::tempdir().map_err(startup_failed)?;
        let client = client_for(addr, cache.path())?;
        Ok(Self {
            downloads,
            _cache: cache,
            client,
            shutdown: Some(shutdown),
        })
    }

    pub fn client(&self) -> &StorageClient {
        &self.client
    }

    /// Number of GET requests served so far
    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl Drop for FlakyExecutorServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Accepts connections and never writes a byte back
pub struct StalledServer {
    _cache: TempDir,
    client: StorageClient,
    accept: JoinHandle<()>,
}

impl StalledServer {
    pub async fn start(request_timeout: Duration) -> Result<Self> {
        let (listener, addr) = bind_ephemeral().await?;
        let accept = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let cache = tempfile::tempdir().map_err(startup_failed)?;
        let config = ClientConfig::new(format!("http://{addr}"))
            .with_executor_dir(cache.path())
            .with_request_timeout(request_timeout);
        let client = StorageClient::new(config)?;
        Ok(Self {
            _cache: cache,
            client,
            accept,
        })
    }

    pub fn client(&self) -> &StorageClient {
        &self.client
    }
}

impl Drop for StalledServer {
    fn drop(&mut self) {
        self.accept.abort();
    }
}

async fn flaky_head(State(state): State<FlakyState>, UrlPath(name): UrlPath<String>) -> Response {
    if name != state.name {
        return StatusCode::NOT_FOUND.into_response();
    }
    state.headers().into_response()
}

async fn flaky_get(State(state): State<FlakyState>, UrlPath(name): UrlPath<String>) -> Response {
    if name != state.name {
        return StatusCode::NOT_FOUND.into_response();
    }

    let served = state.downloads.fetch_add(1, Ordering::SeqCst);
    let mut content = state.good.as_ref().clone();
    if served < state.corrupt_downloads {
        if let Some(first) = content.first_mut() {
            *first ^= 0xff;
        }
    }
    (state.headers(), content).into_response()
}
