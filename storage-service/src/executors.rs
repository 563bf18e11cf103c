// SPDX-License-Identifier: GPL-3.0-only

//! Published executor binaries
//!
//! Only names from the platform table are ever registered. Metadata is
//! computed once at startup; content stays on disk and is read per request.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use storage_contracts::StorageError;
use storage_sys::{file_checksum, sha256_hex};
use storage_types::{ExecutorInfo, PLATFORM_EXECUTORS, is_platform_executor};
use tracing::{info, warn};

use crate::error::Result;

#[derive(Debug, Clone)]
struct PublishedExecutor {
    info: ExecutorInfo,
    path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutorRegistry {
    entries: BTreeMap<String, PublishedExecutor>,
}

impl ExecutorRegistry {
    /// Register every platform executor present in `dir`
    pub async fn load(dir: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (platform, name) in PLATFORM_EXECUTORS {
            let path = dir.join(name);
            match file_checksum(&path).await? {
                Some((size, checksum)) => {
                    info!("Executor {} for {}: {} bytes, sha256 {}", name, platform, size, checksum);
                    entries.insert(
                        name.to_string(),
                        PublishedExecutor {
                            info: ExecutorInfo {
                                name: name.to_string(),
                                size,
                                checksum,
                            },
                            path,
                        },
                    );
                }
                None => warn!("No executor for {} at {}", platform, path.display()),
            }
        }

        Ok(Self { entries })
    }

    pub fn list(&self) -> BTreeMap<String, ExecutorInfo> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.info.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Metadata for `name`, plus its content when `fetch_content` is set.
    ///
    /// Content that no longer matches the published checksum is refused.
    pub async fn executor_info_inspect(
        &self,
        name: &str,
        fetch_content: bool,
    ) -> std::result::Result<(ExecutorInfo, Option<Vec<u8>>), StorageError> {
        if !is_platform_executor(name) {
            tracing::debug!("Executor {} is not a supported platform variant", name);
            return Err(StorageError::executor_not_found(name));
        }
        let entry = self.entries.get(name).ok_or_else(|| {
            warn!("Executor {} is a platform variant but was not published", name);
            StorageError::executor_not_found(name)
        })?;

        if !fetch_content {
            return Ok((entry.info.clone(), None));
        }

        let content = tokio::fs::read(&entry.path).await.map_err(|e| {
            StorageError::internal(format!("Failed to read executor {name}: {e}"))
        })?;
        let actual = sha256_hex(&content);
        if actual != entry.info.checksum || content.len() as u64 != entry.info.size {
            tracing::error!(
                "Executor {} changed on disk since it was published ({} != {})",
                name,
                actual,
                entry.info.checksum
            );
            return Err(StorageError::internal(format!(
                "executor {name} changed since it was published"
            )));
        }

        Ok((entry.info.clone(), Some(content)))
    }
}
