// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use reqwest::Method;
use storage_types::{Snapshot, Volume, VolumeCreateRequest, VolumeSnapshotRequest, VolumesOpts};

use super::{StorageClient, service_query};
use crate::StorageError;

impl StorageClient {
    /// Volumes of every service, each list sorted by ID
    pub async fn volumes(&self) -> Result<BTreeMap<String, Vec<Volume>>, StorageError> {
        self.list_volumes(None, VolumesOpts::default()).await
    }

    /// Volumes of one service, sorted by ID
    pub async fn volumes_by_service(&self, service: &str) -> Result<Vec<Volume>, StorageError> {
        self.volumes_by_service_with(service, VolumesOpts::default())
            .await
    }

    pub async fn volumes_by_service_with(
        &self,
        service: &str,
        opts: VolumesOpts,
    ) -> Result<Vec<Volume>, StorageError> {
        let mut reply = self.list_volumes(Some(service), opts).await?;
        Ok(reply.remove(service).unwrap_or_default())
    }

    async fn list_volumes(
        &self,
        service: Option<&str>,
        opts: VolumesOpts,
    ) -> Result<BTreeMap<String, Vec<Volume>>, StorageError> {
        let mut query = service_query(service);
        if opts.attachments {
            query.push(("attachments", "true"));
        }
        let url = self.url(&["volumes"], &query);
        self.send_json(self.request(Method::GET, url)).await
    }

    pub async fn volume_inspect(
        &self,
        service: &str,
        volume_id: &str,
        opts: VolumesOpts,
    ) -> Result<Volume, StorageError> {
        let mut query = service_query(Some(service));
        if opts.attachments {
            query.push(("attachments", "true"));
        }
        let url = self.url(&["volumes", volume_id], &query);
        self.send_json(self.request(Method::GET, url)).await
    }

    pub async fn volume_create(
        &self,
        service: &str,
        request: &VolumeCreateRequest,
    ) -> Result<Volume, StorageError> {
        let url = self.url(&["volumes"], &service_query(Some(service)));
        self.send_json(self.request(Method::POST, url).json(request))
            .await
    }

    pub async fn volume_remove(&self, service: &str, volume_id: &str) -> Result<(), StorageError> {
        let url = self.url(&["volumes", volume_id], &service_query(Some(service)));
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub async fn volume_snapshot(
        &self,
        service: &str,
        volume_id: &str,
        request: &VolumeSnapshotRequest,
    ) -> Result<Snapshot, StorageError> {
        let url = self.url(
            &["volumes", volume_id, "snapshot"],
            &service_query(Some(service)),
        );
        self.send_json(self.request(Method::POST, url).json(request))
            .await
    }
}
