// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use reqwest::Method;
use storage_types::{Snapshot, SnapshotCopyRequest, Volume, VolumeCreateRequest};

use super::{StorageClient, service_query};
use crate::StorageError;

impl StorageClient {
    /// Snapshots of every service, each list sorted by ID
    pub async fn snapshots(&self) -> Result<BTreeMap<String, Vec<Snapshot>>, StorageError> {
        let url = self.url(&["snapshots"], &[]);
        self.send_json(self.request(Method::GET, url)).await
    }

    pub async fn snapshots_by_service(
        &self,
        service: &str,
    ) -> Result<Vec<Snapshot>, StorageError> {
        let url = self.url(&["snapshots"], &service_query(Some(service)));
        let mut reply: BTreeMap<String, Vec<Snapshot>> =
            self.send_json(self.request(Method::GET, url)).await?;
        Ok(reply.remove(service).unwrap_or_default())
    }

    pub async fn snapshot_inspect(
        &self,
        service: &str,
        snapshot_id: &str,
    ) -> Result<Snapshot, StorageError> {
        let url = self.url(&["snapshots", snapshot_id], &service_query(Some(service)));
        self.send_json(self.request(Method::GET, url)).await
    }

    /// Create a new volume whose content derives from the snapshot
    pub async fn snapshot_create(
        &self,
        service: &str,
        snapshot_id: &str,
        request: &VolumeCreateRequest,
    ) -> Result<Volume, StorageError> {
        let url = self.url(&["snapshots", snapshot_id], &service_query(Some(service)));
        self.send_json(self.request(Method::POST, url).json(request))
            .await
    }

    pub async fn snapshot_remove(
        &self,
        service: &str,
        snapshot_id: &str,
    ) -> Result<(), StorageError> {
        let url = self.url(&["snapshots", snapshot_id], &service_query(Some(service)));
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub async fn snapshot_copy(
        &self,
        service: &str,
        snapshot_id: &str,
        request: &SnapshotCopyRequest,
    ) -> Result<Snapshot, StorageError> {
        let url = self.url(
            &["snapshots", snapshot_id, "copy"],
            &service_query(Some(service)),
        );
        self.send_json(self.request(Method::POST, url).json(request))
            .await
    }
}
