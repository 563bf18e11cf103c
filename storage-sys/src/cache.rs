// SPDX-License-Identifier: GPL-3.0-only

//! On-disk cache of downloaded executor binaries
//!
//! Entries are keyed by executor name. Writes go to a temporary file in the
//! cache directory which is then renamed over the final path, so a reader
//! never sees a partially written binary. Two callers racing to populate the
//! same entry both succeed; the second rename replaces identical bytes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::checksum::file_checksum;
use crate::error::{Result, SysError};

/// A cache entry that is present on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedExecutor {
    pub path: PathBuf,
    pub size: u64,
    pub checksum: String,
}

#[derive(Debug, Clone)]
pub struct ExecutorCache {
    dir: PathBuf,
}

impl ExecutorCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Current size and checksum of the entry for `name`, if cached
    pub async fn lookup(&self, name: &str) -> Result<Option<CachedExecutor>> {
        let path = self.path_for(name);
        Ok(file_checksum(&path)
            .await?
            .map(|(size, checksum)| CachedExecutor {
                path,
                size,
                checksum,
            }))
    }

    /// Entry for `name` only if it matches the expected size and checksum
    pub async fn lookup_matching(
        &self,
        name: &str,
        size: u64,
        checksum: &str,
    ) -> Result<Option<CachedExecutor>> {
        let Some(entry) = self.lookup(name).await? else {
            debug!("No cached executor for {}", name);
            return Ok(None);
        };

        if entry.size == size && entry.checksum == checksum {
            Ok(Some(entry))
        } else {
            debug!(
                "Cached executor {} is stale (size {} vs {}, checksum {} vs {})",
                name, entry.size, size, entry.checksum, checksum
            );
            Ok(None)
        }
    }

    /// Atomically write `content` as the entry for `name` and mark it executable
    pub async fn store(&self, name: &str, content: Vec<u8>) -> Result<PathBuf> {
        let dir = self.dir.clone();
        let path = self.path_for(name);
        let target = path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &content))
            .await
            .map_err(|e| SysError::Task(e.to_string()))??;

        info!("Cached executor {} at {:?}", name, path);
        Ok(path)
    }
}

fn write_atomic(dir: &Path, target: &Path, content: &[u8]) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    set_executable(temp.path())?;

    // Close the handle before anyone can exec the file.
    let file = temp.persist(target).map_err(|e| SysError::Io(e.error))?;
    drop(file);
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::checksum::sha256_hex;

    #[tokio::test]
    async fn store_then_lookup_reports_size_and_checksum() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = ExecutorCache::new(dir.path().join("cache"));
        let content = b"#!/bin/sh\necho hi\n".to_vec();

        let path = cache
            .store("lsx-linux", content.clone())
            .await
            .expect("store executor");
        assert_eq!(path, cache.path_for("lsx-linux"));

        let entry = cache
            .lookup("lsx-linux")
            .await
            .expect("lookup executor")
            .expect("entry should exist");
        assert_eq!(entry.size, content.len() as u64);
        assert_eq!(entry.checksum, sha256_hex(&content));
    }

    #[tokio::test]
    async fn stale_entry_does_not_match() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = ExecutorCache::new(dir.path());
        cache
            .store("lsx-linux", b"old".to_vec())
            .await
            .expect("store executor");

        let fresh = sha256_hex(b"new!");
        let hit = cache
            .lookup_matching("lsx-linux", 4, &fresh)
            .await
            .expect("lookup executor");
        assert!(hit.is_none());

        let old = sha256_hex(b"old");
        let hit = cache
            .lookup_matching("lsx-linux", 3, &old)
            .await
            .expect("lookup executor");
        assert!(hit.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stored_entries_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = ExecutorCache::new(dir.path());
        let path = cache
            .store("lsx-linux", b"bin".to_vec())
            .await
            .expect("store executor");

        let mode = fs::metadata(&path).expect("stat executor").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn concurrent_stores_leave_one_complete_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = Arc::new(ExecutorCache::new(dir.path()));
        let content = vec![7u8; 256 * 1024];

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let content = content.clone();
            tasks.push(tokio::spawn(async move {
                cache.store("lsx-darwin", content).await
            }));
        }
        for task in tasks {
            task.await.expect("join store task").expect("store executor");
        }

        let on_disk = fs::read(cache.path_for("lsx-darwin")).expect("read executor");
        assert_eq!(on_disk, content);

        let leftovers = fs::read_dir(dir.path()).expect("list cache dir").count();
        assert_eq!(leftovers, 1);
    }
}
