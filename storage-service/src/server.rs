// SPDX-License-Identifier: GPL-3.0-only

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Uri};
use axum::response::Response;
use axum::routing::{get, post};
use storage_contracts::{RequestId, StorageError};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::StorageConfig;
use crate::error::{Result, envelope_response};
use crate::executors::ExecutorRegistry;
use crate::handlers::{executors, services, snapshots, volumes};
use crate::lifecycle::Lifecycle;
use crate::routing::{DriverRegistry, ServiceRegistry};

/// Shared state for axum handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Lifecycle,
    pub executors: Arc<ExecutorRegistry>,
}

impl AppState {
    /// Build the driver table, bind services and load executors
    pub async fn build(config: &StorageConfig, drivers: &DriverRegistry) -> Result<Self> {
        let services = ServiceRegistry::build(config, drivers)?;
        let executors = match &config.executors.dir {
            Some(dir) => ExecutorRegistry::load(dir).await?,
            None => {
                tracing::warn!("No executor directory configured; executor routes will be empty");
                ExecutorRegistry::default()
            }
        };

        Ok(Self {
            lifecycle: Lifecycle::new(Arc::new(services)),
            executors: Arc::new(executors),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/services", get(services::list))
        .route("/services/{name}", get(services::inspect))
        .route("/volumes", get(volumes::list).post(volumes::create))
        .route(
            "/volumes/{id}",
            get(volumes::inspect).delete(volumes::remove),
        )
        .route("/volumes/{id}/snapshot", post(volumes::snapshot))
        .route("/snapshots", get(snapshots::list))
        .route(
            "/snapshots/{id}",
            get(snapshots::inspect)
                .post(snapshots::create_volume)
                .delete(snapshots::remove),
        )
        .route("/snapshots/{id}/copy", post(snapshots::copy))
        .route("/executors", get(executors::list))
        .route(
            "/executors/{name}",
            get(executors::get).head(executors::head),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(RequestId::HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| RequestId::new().to_string());

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

async fn not_found() -> Response {
    envelope_response(StorageError::resource_not_found())
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    envelope_response(StorageError::method_not_allowed(method.as_str(), uri.path()))
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
