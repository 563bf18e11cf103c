// SPDX-License-Identifier: GPL-3.0-only

//! Executor distribution and host-local queries
//!
//! The client never trusts a cached binary blindly: the service advertises the
//! size and checksum of each executor and the cache entry is replaced whenever
//! it no longer matches. Downloads are verified before they are stored.

use std::collections::BTreeMap;
use std::path::PathBuf;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use storage_sys::{invoke, sha256_hex};
use storage_types::{
    ExecutorInfo, InstanceId, LocalDevices, NextDevice, ServiceInfo, executor_name_for_os,
};
use tracing::{debug, info, warn};

use super::StorageClient;
use crate::{EXECUTOR_CHECKSUM_HEADER, EXECUTOR_SIZE_HEADER, StorageError, StorageErrorKind};

/// Download attempts before a checksum mismatch is reported
const FETCH_ATTEMPTS: usize = 2;

/// Executor name for the host this process runs on
pub fn host_executor_name() -> Result<&'static str, StorageError> {
    let os = std::env::consts::OS;
    executor_name_for_os(os).ok_or_else(|| StorageError::executor_not_found(&format!("lsx-{os}")))
}

impl StorageClient {
    /// Every executor the service publishes, keyed by name
    pub async fn executors(&self) -> Result<BTreeMap<String, ExecutorInfo>, StorageError> {
        let url = self.url(&["executors"], &[]);
        self.send_json(self.request(Method::GET, url)).await
    }

    /// Size and checksum of one executor without transferring it
    pub async fn executor_head(&self, name: &str) -> Result<ExecutorInfo, StorageError> {
        let url = self.url(&["executors", name], &[]);
        let response = self
            .send(self.request(Method::HEAD, url))
            .await
            .map_err(|e| refine_not_found(e, name))?;
        executor_info_from_headers(name, response.headers())
    }

    /// Content of one executor together with the metadata the service sent with it
    pub async fn executor_get(&self, name: &str) -> Result<(ExecutorInfo, Vec<u8>), StorageError> {
        let url = self.url(&["executors", name], &[]);
        let response = self
            .send(self.request(Method::GET, url))
            .await
            .map_err(|e| refine_not_found(e, name))?;
        let info = executor_info_from_headers(name, response.headers())?;
        let content = response.bytes().await?;
        Ok((info, content.to_vec()))
    }

    /// Make sure the executor for this host is cached and current, returning its path
    pub async fn ensure_executor(&self) -> Result<PathBuf, StorageError> {
        self.ensure_executor_named(host_executor_name()?).await
    }

    /// Make sure the named executor is cached and current, returning its path
    pub async fn ensure_executor_named(&self, name: &str) -> Result<PathBuf, StorageError> {
        let advertised = self.executor_head(name).await?;
        if let Some(entry) = self
            .executor_cache
            .lookup_matching(name, advertised.size, &advertised.checksum)
            .await?
        {
            debug!("Executor {} is current at {:?}", name, entry.path);
            return Ok(entry.path);
        }

        let mut mismatch = None;
        for attempt in 1..=FETCH_ATTEMPTS {
            let (info, content) = self.executor_get(name).await?;
            let actual = sha256_hex(&content);
            if actual == info.checksum && content.len() as u64 == info.size {
                let path = self.executor_cache.store(name, content).await?;
                info!("Fetched executor {} ({} bytes)", name, info.size);
                return Ok(path);
            }

            warn!(
                "Executor {} failed verification on attempt {}: expected {}, got {}",
                name, attempt, info.checksum, actual
            );
            mismatch = Some(StorageError::checksum_mismatch(name, &info.checksum, &actual));
        }

        Err(mismatch.unwrap_or_else(|| StorageError::checksum_mismatch(name, "", "")))
    }

    /// Identity of this host for the driver behind `service`
    pub async fn instance_id(&self, service: &str) -> Result<InstanceId, StorageError> {
        let info = self.service_inspect(service).await?;
        self.run_executor(&info, &["instance-id"]).await
    }

    /// Devices on this host that belong to the driver behind `service`
    pub async fn local_devices(&self, service: &str) -> Result<LocalDevices, StorageError> {
        let info = self.service_inspect(service).await?;
        self.run_executor(&info, &["local-devices"]).await
    }

    /// Next free device name for attaching a volume of `service`.
    ///
    /// Returns `None` without running the executor when the driver ignores
    /// device naming.
    pub async fn next_device(&self, service: &str) -> Result<Option<String>, StorageError> {
        let info = self.service_inspect(service).await?;
        let naming = &info.driver.next_device;
        if naming.ignore {
            return Ok(None);
        }

        let reply: NextDevice = self
            .run_executor(
                &info,
                &[
                    "next-device",
                    "--prefix",
                    naming.prefix.as_str(),
                    "--pattern",
                    naming.pattern.as_str(),
                ],
            )
            .await?;
        Ok(reply.device)
    }

    async fn run_executor<T: DeserializeOwned>(
        &self,
        service: &ServiceInfo,
        command: &[&str],
    ) -> Result<T, StorageError> {
        let path = self.ensure_executor().await?;
        let args: Vec<String> = std::iter::once(service.driver.name.as_str())
            .chain(command.iter().copied())
            .map(str::to_string)
            .collect();

        let output = invoke(&path, &args, self.executor_timeout).await?;
        serde_json::from_str(&output).map_err(|e| {
            StorageError::internal(format!(
                "Executor {} returned malformed output for {}: {e}",
                path.display(),
                command.first().copied().unwrap_or_default()
            ))
        })
    }
}

fn refine_not_found(error: StorageError, name: &str) -> StorageError {
    if error.kind == StorageErrorKind::NotFound {
        StorageError::executor_not_found(name)
    } else {
        error
    }
}

fn executor_info_from_headers(name: &str, headers: &HeaderMap) -> Result<ExecutorInfo, StorageError> {
    let header = |key: &str| {
        headers
            .get(key)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| StorageError::internal(format!("Executor {name}: missing {key} header")))
    };

    let size = header(EXECUTOR_SIZE_HEADER)?
        .parse::<u64>()
        .map_err(|e| StorageError::internal(format!("Executor {name}: bad size header: {e}")))?;

    Ok(ExecutorInfo {
        name: name.to_string(),
        size,
        checksum: header(EXECUTOR_CHECKSUM_HEADER)?,
    })
}
