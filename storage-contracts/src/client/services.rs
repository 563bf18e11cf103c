// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use reqwest::Method;
use storage_types::ServiceInfo;

use super::StorageClient;
use crate::StorageError;

impl StorageClient {
    /// All configured services, keyed by name
    pub async fn services(&self) -> Result<BTreeMap<String, ServiceInfo>, StorageError> {
        let url = self.url(&["services"], &[]);
        self.send_json(self.request(Method::GET, url)).await
    }

    pub async fn service_inspect(&self, name: &str) -> Result<ServiceInfo, StorageError> {
        let url = self.url(&["services", name], &[]);
        self.send_json(self.request(Method::GET, url)).await
    }
}
