// SPDX-License-Identifier: GPL-3.0-only

//! Volume and snapshot operations on top of the service registry
//!
//! Requests are validated before any driver is touched. Listings are sorted
//! ascending by ID regardless of backend order. Nothing here retries.

use std::collections::BTreeMap;
use std::sync::Arc;

use storage_contracts::StorageError;
use storage_types::{
    Snapshot, SnapshotCopyRequest, Volume, VolumeCreateRequest, VolumeSnapshotRequest,
    VolumesOpts, sort_snapshots_by_id, sort_volumes_by_id,
};

use crate::routing::{ServiceBinding, ServiceRegistry};

type Result<T> = std::result::Result<T, StorageError>;

#[derive(Clone)]
pub struct Lifecycle {
    services: Arc<ServiceRegistry>,
}

impl Lifecycle {
    pub fn new(services: Arc<ServiceRegistry>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Bindings addressed by a listing: one service, or all of them
    fn scope(&self, service: Option<&str>) -> Result<Vec<&ServiceBinding>> {
        match service {
            Some(_) => Ok(vec![self.services.resolve(service)?]),
            None => Ok(self.services.bindings().collect()),
        }
    }

    pub async fn volumes(
        &self,
        service: Option<&str>,
        opts: &VolumesOpts,
    ) -> Result<BTreeMap<String, Vec<Volume>>> {
        let mut listing = BTreeMap::new();
        for binding in self.scope(service)? {
            let mut volumes = binding.driver.volumes(opts).await.map_err(normalize)?;
            sort_volumes_by_id(&mut volumes);
            let volumes = volumes
                .into_iter()
                .map(|volume| strip_attachments(volume, opts))
                .collect();
            listing.insert(binding.info.name.clone(), volumes);
        }
        Ok(listing)
    }

    pub async fn volume_inspect(
        &self,
        service: Option<&str>,
        volume_id: &str,
        opts: &VolumesOpts,
    ) -> Result<Volume> {
        let binding = self.services.resolve(service)?;
        let volume = binding
            .driver
            .volume_inspect(volume_id, opts)
            .await
            .map_err(normalize)?;
        Ok(strip_attachments(volume, opts))
    }

    pub async fn volume_create(
        &self,
        service: Option<&str>,
        request: &VolumeCreateRequest,
    ) -> Result<Volume> {
        validate_volume_request(request)?;
        let binding = self.services.resolve(service)?;
        let volume = binding
            .driver
            .volume_create(request)
            .await
            .map_err(normalize)?;
        tracing::info!(
            "Created volume {} ({}) on {}",
            volume.id,
            volume.name,
            binding.info.name
        );
        Ok(volume)
    }

    pub async fn volume_remove(&self, service: Option<&str>, volume_id: &str) -> Result<()> {
        let binding = self.services.resolve(service)?;
        binding
            .driver
            .volume_remove(volume_id)
            .await
            .map_err(normalize)?;
        tracing::info!("Removed volume {} from {}", volume_id, binding.info.name);
        Ok(())
    }

    pub async fn volume_snapshot(
        &self,
        service: Option<&str>,
        volume_id: &str,
        request: &VolumeSnapshotRequest,
    ) -> Result<Snapshot> {
        require_name("snapshot_name", &request.snapshot_name)?;
        let binding = self.services.resolve(service)?;
        let snapshot = binding
            .driver
            .volume_snapshot(volume_id, request)
            .await
            .map_err(normalize)?;
        tracing::info!(
            "Snapshot {} of volume {} on {}",
            snapshot.id,
            volume_id,
            binding.info.name
        );
        Ok(snapshot)
    }

    pub async fn snapshots(&self, service: Option<&str>) -> Result<BTreeMap<String, Vec<Snapshot>>> {
        let mut listing = BTreeMap::new();
        for binding in self.scope(service)? {
            let mut snapshots: Vec<Snapshot> = binding
                .driver
                .snapshots()
                .await
                .map_err(normalize)?
                .into_values()
                .collect();
            sort_snapshots_by_id(&mut snapshots);
            listing.insert(binding.info.name.clone(), snapshots);
        }
        Ok(listing)
    }

    pub async fn snapshot_inspect(
        &self,
        service: Option<&str>,
        snapshot_id: &str,
    ) -> Result<Snapshot> {
        let binding = self.services.resolve(service)?;
        binding
            .driver
            .snapshot_inspect(snapshot_id)
            .await
            .map_err(normalize)
    }

    /// Materialize a new volume from a snapshot
    pub async fn snapshot_create(
        &self,
        service: Option<&str>,
        snapshot_id: &str,
        request: &VolumeCreateRequest,
    ) -> Result<Volume> {
        validate_volume_request(request)?;
        let binding = self.services.resolve(service)?;
        let volume = binding
            .driver
            .snapshot_create(snapshot_id, request)
            .await
            .map_err(normalize)?;
        tracing::info!(
            "Created volume {} from snapshot {} on {}",
            volume.id,
            snapshot_id,
            binding.info.name
        );
        Ok(volume)
    }

    pub async fn snapshot_remove(&self, service: Option<&str>, snapshot_id: &str) -> Result<()> {
        let binding = self.services.resolve(service)?;
        binding
            .driver
            .snapshot_remove(snapshot_id)
            .await
            .map_err(normalize)?;
        tracing::info!("Removed snapshot {} from {}", snapshot_id, binding.info.name);
        Ok(())
    }

    pub async fn snapshot_copy(
        &self,
        service: Option<&str>,
        snapshot_id: &str,
        request: &SnapshotCopyRequest,
    ) -> Result<Snapshot> {
        require_name("snapshot_name", &request.snapshot_name)?;
        let binding = self.services.resolve(service)?;
        binding
            .driver
            .snapshot_copy(snapshot_id, request)
            .await
            .map_err(normalize)
    }
}

fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StorageError::invalid_input(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_volume_request(request: &VolumeCreateRequest) -> Result<()> {
    require_name("name", &request.name)?;
    if request.size.is_some_and(|size| size < 0) {
        return Err(StorageError::invalid_input("size must not be negative"));
    }
    if request.iops.is_some_and(|iops| iops < 0) {
        return Err(StorageError::invalid_input("iops must not be negative"));
    }
    Ok(())
}

fn strip_attachments(mut volume: Volume, opts: &VolumesOpts) -> Volume {
    if !opts.attachments {
        volume.attachments.clear();
    }
    volume
}

/// Drivers may hand back bare errors; give them the canonical message of their kind
fn normalize(error: StorageError) -> StorageError {
    StorageError::new(error.kind, error.message)
}
