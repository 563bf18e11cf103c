// SPDX-License-Identifier: GPL-3.0-only

//! YAML configuration rooted at `storage:`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use storage_types::{NextDeviceInfo, Opts};

use crate::error::{Result, ServiceError};

pub const DEFAULT_HOST: &str = "127.0.0.1:7979";

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Default backend; also names the default service
    #[serde(default)]
    pub driver: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub executors: ExecutorsConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorsConfig {
    /// Directory holding the platform executor binaries
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// A bare `name:` entry is valid and inherits everything
    #[serde(default)]
    pub services: BTreeMap<String, Option<ServiceConfig>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub driver: Option<String>,

    /// Overrides the driver's default device naming
    #[serde(default)]
    pub next_device: Option<NextDeviceInfo>,

    /// Passed to the driver constructor untouched
    #[serde(default)]
    pub options: Opts,
}

/// A service entry after inheritance from the top-level settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedService {
    pub name: String,
    pub driver: String,
    pub next_device: Option<NextDeviceInfo>,
    pub options: Opts,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl StorageConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(text).map_err(|e| ServiceError::Config(e.to_string()))?;
        Ok(file.storage)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// Every service to bind, in name order.
    ///
    /// The top-level driver contributes a service of the same name unless one
    /// is declared explicitly; declared services inherit the top-level driver.
    pub fn services(&self) -> Result<Vec<ResolvedService>> {
        let mut declared = self.server.services.clone();
        if let Some(driver) = &self.driver {
            declared.entry(driver.clone()).or_insert(None);
        }

        declared
            .into_iter()
            .map(|(name, entry)| {
                let entry = entry.unwrap_or_default();
                let driver = entry
                    .driver
                    .or_else(|| self.driver.clone())
                    .ok_or_else(|| {
                        ServiceError::Config(format!("Service {name} has no driver configured"))
                    })?;
                Ok(ResolvedService {
                    name,
                    driver,
                    next_device: entry.next_device,
                    options: entry.options,
                })
            })
            .collect()
    }
}
