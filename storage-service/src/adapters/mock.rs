// SPDX-License-Identifier: GPL-3.0-only

//! In-memory reference driver
//!
//! Every instance starts from the same fixture set so that independent
//! services backed by `mock` behave identically but never share state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use storage_contracts::{Driver, StorageError};
use storage_executor::mock as local;
use storage_types::{
    InstanceId, NextDeviceInfo, Snapshot, SnapshotCopyRequest, Volume, VolumeAttachment,
    VolumeCreateRequest, VolumeSnapshotRequest, VolumesOpts,
};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::ResolvedService;

pub const DRIVER_NAME: &str = local::DRIVER_NAME;

const FIXTURE_COUNT: u64 = 3;
const FIXTURE_SIZE: i64 = 100;
const FIXTURE_TYPE: &str = "gold";

/// Device naming used when a service does not override it
pub fn default_next_device() -> NextDeviceInfo {
    NextDeviceInfo {
        ignore: false,
        prefix: "xvd".to_string(),
        pattern: r"\w".to_string(),
    }
}

pub fn build(_service: &ResolvedService) -> Result<Arc<dyn Driver>, StorageError> {
    Ok(Arc::new(MockDriver::new()))
}

#[derive(Debug, Error)]
enum MockError {
    #[error("volume {0} does not exist")]
    VolumeNotFound(String),

    #[error("snapshot {0} does not exist")]
    SnapshotNotFound(String),
}

impl From<MockError> for StorageError {
    fn from(err: MockError) -> Self {
        tracing::debug!("mock: {}", err);
        match err {
            MockError::VolumeNotFound(_) | MockError::SnapshotNotFound(_) => {
                StorageError::resource_not_found()
            }
        }
    }
}

#[derive(Debug)]
struct MockState {
    volumes: HashMap<String, Volume>,
    snapshots: HashMap<String, Snapshot>,
    next_volume: u64,
    next_snapshot: u64,
}

impl MockState {
    fn with_fixtures() -> Self {
        let created = chrono::Utc::now().timestamp();
        let volumes = (0..FIXTURE_COUNT)
            .map(|n| {
                let volume = fixture_volume(n);
                (volume.id.clone(), volume)
            })
            .collect();
        let snapshots = (0..FIXTURE_COUNT)
            .map(|n| {
                let snapshot = Snapshot {
                    id: snapshot_id(n),
                    name: format!("Snapshot {n}"),
                    volume_id: volume_id(n),
                    volume_size: FIXTURE_SIZE,
                    status: "completed".to_string(),
                    start_time: created,
                    description: String::new(),
                    opts: Default::default(),
                };
                (snapshot.id.clone(), snapshot)
            })
            .collect();

        Self {
            volumes,
            snapshots,
            next_volume: FIXTURE_COUNT,
            next_snapshot: FIXTURE_COUNT,
        }
    }

    fn allocate_volume_id(&mut self) -> String {
        let id = volume_id(self.next_volume);
        self.next_volume += 1;
        id
    }

    fn allocate_snapshot_id(&mut self) -> String {
        let id = snapshot_id(self.next_snapshot);
        self.next_snapshot += 1;
        id
    }

    fn volume(&self, id: &str) -> Result<&Volume, MockError> {
        self.volumes
            .get(id)
            .ok_or_else(|| MockError::VolumeNotFound(id.to_string()))
    }

    fn snapshot(&self, id: &str) -> Result<&Snapshot, MockError> {
        self.snapshots
            .get(id)
            .ok_or_else(|| MockError::SnapshotNotFound(id.to_string()))
    }

    fn insert_volume(&mut self, request: &VolumeCreateRequest, default_size: i64) -> Volume {
        let volume = Volume {
            id: self.allocate_volume_id(),
            name: request.name.clone(),
            availability_zone: request
                .availability_zone
                .clone()
                .unwrap_or_else(|| local::AVAILABILITY_ZONE.to_string()),
            iops: request.iops.unwrap_or(0),
            size: request.size.unwrap_or(default_size),
            volume_type: request
                .volume_type
                .clone()
                .unwrap_or_else(|| FIXTURE_TYPE.to_string()),
            status: "available".to_string(),
            attachments: Vec::new(),
            opts: request.opts.clone(),
        };
        self.volumes.insert(volume.id.clone(), volume.clone());
        volume
    }

    fn insert_snapshot(&mut self, snapshot: Snapshot) -> Snapshot {
        self.snapshots.insert(snapshot.id.clone(), snapshot.clone());
        snapshot
    }
}

fn volume_id(n: u64) -> String {
    format!("vol-{n:03}")
}

fn snapshot_id(n: u64) -> String {
    format!("snap-{n:03}")
}

fn fixture_volume(n: u64) -> Volume {
    let id = volume_id(n);
    let (device, attached_volume) = local::ATTACHED_DEVICE;
    let attachments = if id == attached_volume {
        vec![VolumeAttachment {
            instance_id: local::INSTANCE_ID.to_string(),
            device_name: device.to_string(),
            status: "attached".to_string(),
        }]
    } else {
        Vec::new()
    };

    Volume {
        id,
        name: format!("Volume {n}"),
        availability_zone: format!("zone-{n:03}"),
        iops: 0,
        size: FIXTURE_SIZE,
        volume_type: FIXTURE_TYPE.to_string(),
        status: if attachments.is_empty() { "available" } else { "in-use" }.to_string(),
        attachments,
        opts: Default::default(),
    }
}

fn with_attachments(mut volume: Volume, opts: &VolumesOpts) -> Volume {
    if !opts.attachments {
        volume.attachments.clear();
    }
    volume
}

pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::with_fixtures()),
        }
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for MockDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    async fn instance_id(&self) -> Result<InstanceId, StorageError> {
        Ok(local::instance_id())
    }

    async fn volumes(&self, opts: &VolumesOpts) -> Result<Vec<Volume>, StorageError> {
        let state = self.state.lock().await;
        Ok(state
            .volumes
            .values()
            .cloned()
            .map(|volume| with_attachments(volume, opts))
            .collect())
    }

    async fn volume_inspect(
        &self,
        volume_id: &str,
        opts: &VolumesOpts,
    ) -> Result<Volume, StorageError> {
        let state = self.state.lock().await;
        let volume = state.volume(volume_id)?.clone();
        Ok(with_attachments(volume, opts))
    }

    async fn volume_create(&self, request: &VolumeCreateRequest) -> Result<Volume, StorageError> {
        let mut state = self.state.lock().await;
        Ok(state.insert_volume(request, 0))
    }

    async fn volume_remove(&self, volume_id: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        state
            .volumes
            .remove(volume_id)
            .ok_or_else(|| MockError::VolumeNotFound(volume_id.to_string()))?;
        Ok(())
    }

    async fn volume_snapshot(
        &self,
        volume_id: &str,
        request: &VolumeSnapshotRequest,
    ) -> Result<Snapshot, StorageError> {
        let mut state = self.state.lock().await;
        let volume_size = state.volume(volume_id)?.size;
        let snapshot = Snapshot {
            id: state.allocate_snapshot_id(),
            name: request.snapshot_name.clone(),
            volume_id: volume_id.to_string(),
            volume_size,
            status: "completed".to_string(),
            start_time: chrono::Utc::now().timestamp(),
            description: String::new(),
            opts: request.opts.clone(),
        };
        Ok(state.insert_snapshot(snapshot))
    }

    async fn snapshots(&self) -> Result<HashMap<String, Snapshot>, StorageError> {
        let state = self.state.lock().await;
        Ok(state.snapshots.clone())
    }

    async fn snapshot_inspect(&self, snapshot_id: &str) -> Result<Snapshot, StorageError> {
        let state = self.state.lock().await;
        Ok(state.snapshot(snapshot_id)?.clone())
    }

    async fn snapshot_create(
        &self,
        snapshot_id: &str,
        request: &VolumeCreateRequest,
    ) -> Result<Volume, StorageError> {
        let mut state = self.state.lock().await;
        let volume_size = state.snapshot(snapshot_id)?.volume_size;
        Ok(state.insert_volume(request, volume_size))
    }

    async fn snapshot_remove(&self, snapshot_id: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        state
            .snapshots
            .remove(snapshot_id)
            .ok_or_else(|| MockError::SnapshotNotFound(snapshot_id.to_string()))?;
        Ok(())
    }

    async fn snapshot_copy(
        &self,
        snapshot_id: &str,
        request: &SnapshotCopyRequest,
    ) -> Result<Snapshot, StorageError> {
        let mut state = self.state.lock().await;
        let source = state.snapshot(snapshot_id)?.clone();
        let copy = Snapshot {
            id: state.allocate_snapshot_id(),
            name: request.snapshot_name.clone(),
            volume_id: source.volume_id,
            volume_size: source.volume_size,
            status: "completed".to_string(),
            start_time: chrono::Utc::now().timestamp(),
            description: source.description,
            opts: request.opts.clone(),
        };
        Ok(state.insert_snapshot(copy))
    }
}
