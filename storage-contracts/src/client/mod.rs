// SPDX-License-Identifier: GPL-3.0-only

//! HTTP client for the storage service
//!
//! Every method maps one-to-one onto a remote call and returns either the
//! decoded result or a `StorageError` decoded from the error envelope.

pub mod connection;
pub mod error;
pub mod executors;
pub mod services;
pub mod snapshots;
pub mod volumes;

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use storage_sys::ExecutorCache;
use tracing::debug;

use crate::client::connection::shared_http_client;
use crate::client::error::error_from_body;
use crate::{RequestId, StorageError};

pub use executors::host_executor_name;

const DEFAULT_EXECUTOR_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service; a bare `host:port` is treated as `http://`
    pub endpoint: String,

    /// Where downloaded executors are cached
    pub executor_dir: PathBuf,

    /// Upper bound for a single executor invocation
    pub executor_timeout: Duration,

    /// Upper bound for one HTTP call, from send until the body is read
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            executor_dir: std::env::temp_dir().join("storage-executors"),
            executor_timeout: DEFAULT_EXECUTOR_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_executor_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executor_dir = dir.into();
        self
    }

    pub fn with_executor_timeout(mut self, timeout: Duration) -> Self {
        self.executor_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for the storage service
pub struct StorageClient {
    http: &'static reqwest::Client,
    endpoint: Url,
    executor_cache: ExecutorCache,
    executor_timeout: Duration,
    request_timeout: Duration,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl StorageClient {
    pub fn new(config: ClientConfig) -> Result<Self, StorageError> {
        let endpoint = if config.endpoint.contains("://") {
            config.endpoint.clone()
        } else {
            format!("http://{}", config.endpoint)
        };
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            StorageError::invalid_input(format!("Invalid endpoint {}: {e}", config.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(StorageError::invalid_input(format!(
                "Invalid endpoint {}: not a base URL",
                config.endpoint
            )));
        }

        Ok(Self {
            http: shared_http_client()?,
            endpoint,
            executor_cache: ExecutorCache::new(config.executor_dir),
            executor_timeout: config.executor_timeout,
            request_timeout: config.request_timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request_id = RequestId::new();
        debug!("{} {} ({})", method, url, request_id);
        self.http
            .request(method, url)
            .timeout(self.request_timeout)
            .header(RequestId::HEADER, request_id.to_string())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let response = request.send().await?;
        check(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, StorageError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Pass successful responses through; turn everything else into a `StorageError`
async fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status.as_u16(), &body))
}

/// Query pairs selecting a service, omitted when the default service is meant
fn service_query(service: Option<&str>) -> Vec<(&str, &str)> {
    service.map(|name| vec![("service", name)]).unwrap_or_default()
}
