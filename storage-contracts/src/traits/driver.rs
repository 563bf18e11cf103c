// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use async_trait::async_trait;

use storage_types::{
    InstanceId, Snapshot, SnapshotCopyRequest, Volume, VolumeCreateRequest,
    VolumeSnapshotRequest, VolumesOpts,
};

use crate::StorageError;

/// Capability set every storage backend implements.
///
/// One instance is bound per configured service. Implementations serialize
/// their own mutations; the registry shares instances across requests
/// without locking.
///
/// Snapshot capabilities are optional and default to `Unsupported`.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Variant name this instance was built from (e.g. "mock")
    fn name(&self) -> &str;

    async fn instance_id(&self) -> Result<InstanceId, StorageError>;

    async fn volumes(&self, opts: &VolumesOpts) -> Result<Vec<Volume>, StorageError>;

    async fn volume_inspect(
        &self,
        volume_id: &str,
        opts: &VolumesOpts,
    ) -> Result<Volume, StorageError>;

    async fn volume_create(&self, request: &VolumeCreateRequest) -> Result<Volume, StorageError>;

    async fn volume_remove(&self, volume_id: &str) -> Result<(), StorageError>;

    async fn volume_snapshot(
        &self,
        _volume_id: &str,
        _request: &VolumeSnapshotRequest,
    ) -> Result<Snapshot, StorageError> {
        Err(StorageError::unsupported("volume snapshot"))
    }

    async fn snapshots(&self) -> Result<HashMap<String, Snapshot>, StorageError> {
        Err(StorageError::unsupported("snapshot listing"))
    }

    async fn snapshot_inspect(&self, _snapshot_id: &str) -> Result<Snapshot, StorageError> {
        Err(StorageError::unsupported("snapshot inspect"))
    }

    /// Materialize a new volume from the snapshot's captured state
    async fn snapshot_create(
        &self,
        _snapshot_id: &str,
        _request: &VolumeCreateRequest,
    ) -> Result<Volume, StorageError> {
        Err(StorageError::unsupported("volume from snapshot"))
    }

    async fn snapshot_remove(&self, _snapshot_id: &str) -> Result<(), StorageError> {
        Err(StorageError::unsupported("snapshot remove"))
    }

    async fn snapshot_copy(
        &self,
        _snapshot_id: &str,
        _request: &SnapshotCopyRequest,
    ) -> Result<Snapshot, StorageError> {
        Err(StorageError::unsupported("snapshot copy"))
    }
}
