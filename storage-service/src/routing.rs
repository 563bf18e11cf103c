// SPDX-License-Identifier: GPL-3.0-only

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use storage_contracts::{Driver, StorageError};
use storage_types::{DriverInfo, NextDeviceInfo, ServiceInfo};

use crate::adapters::mock;
use crate::config::{ResolvedService, StorageConfig};
use crate::error::{Result, ServiceError};

pub type DriverConstructor = fn(&ResolvedService) -> std::result::Result<Arc<dyn Driver>, StorageError>;

/// One backend variant that services can be bound to
#[derive(Clone)]
pub struct DriverEntry {
    pub name: &'static str,
    pub next_device: NextDeviceInfo,
    pub build: DriverConstructor,
}

/// Name-keyed table of driver variants, fixed at startup
#[derive(Clone, Default)]
pub struct DriverRegistry {
    entries: HashMap<&'static str, DriverEntry>,
}

impl DriverRegistry {
    /// All drivers compiled into this service
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(DriverEntry {
            name: mock::DRIVER_NAME,
            next_device: mock::default_next_device(),
            build: mock::build,
        });
        registry
    }

    pub fn register(&mut self, entry: DriverEntry) {
        self.entries.insert(entry.name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&DriverEntry> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// A configured service and the driver instance that backs it
pub struct ServiceBinding {
    pub info: ServiceInfo,
    pub driver: Arc<dyn Driver>,
}

/// Service name to driver instance, immutable once built
pub struct ServiceRegistry {
    services: BTreeMap<String, ServiceBinding>,
    default_service: Option<String>,
}

impl ServiceRegistry {
    /// Bind every configured service to a fresh driver instance.
    ///
    /// Fails if any service names a driver that is not registered.
    pub fn build(config: &StorageConfig, drivers: &DriverRegistry) -> Result<Self> {
        let mut services = BTreeMap::new();

        for service in config.services()? {
            let entry = drivers
                .get(&service.driver)
                .ok_or_else(|| ServiceError::UnknownDriver {
                    service: service.name.clone(),
                    driver: service.driver.clone(),
                })?;

            let driver = (entry.build)(&service)?;
            let info = ServiceInfo {
                name: service.name.clone(),
                driver: DriverInfo {
                    name: entry.name.to_string(),
                    next_device: service
                        .next_device
                        .clone()
                        .unwrap_or_else(|| entry.next_device.clone()),
                },
            };
            tracing::debug!("Bound service {} to driver {}", info.name, entry.name);
            services.insert(service.name, ServiceBinding { info, driver });
        }

        Ok(Self {
            services,
            default_service: config.driver.clone(),
        })
    }

    pub fn services_list(&self) -> BTreeMap<String, ServiceInfo> {
        self.services
            .iter()
            .map(|(name, binding)| (name.clone(), binding.info.clone()))
            .collect()
    }

    pub fn service_inspect(&self, name: &str) -> std::result::Result<ServiceInfo, StorageError> {
        self.services
            .get(name)
            .map(|binding| binding.info.clone())
            .ok_or_else(StorageError::resource_not_found)
    }

    /// Look up a service, falling back to the default when no name is given
    pub fn resolve(&self, name: Option<&str>) -> std::result::Result<&ServiceBinding, StorageError> {
        let name = match name {
            Some(name) => name,
            None => self.default_service().ok_or_else(|| {
                StorageError::invalid_input("service name required: no default service configured")
            })?,
        };
        self.services
            .get(name)
            .ok_or_else(StorageError::resource_not_found)
    }

    pub fn default_service(&self) -> Option<&str> {
        self.default_service.as_deref()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ServiceBinding> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_contracts::StorageErrorKind;
    use storage_types::VolumesOpts;

    fn registry(yaml: &str) -> ServiceRegistry {
        let config = StorageConfig::from_yaml(yaml).expect("config");
        ServiceRegistry::build(&config, &DriverRegistry::builtin()).expect("registry")
    }

    const THREE_SERVICES: &str = r#"
storage:
  driver: mock
  server:
    services:
      mock2:
      mock3:
"#;

    #[test]
    fn builds_one_binding_per_service() {
        let registry = registry(THREE_SERVICES);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.default_service(), Some("mock"));
        let mock2 = registry.resolve(Some("mock2")).expect("mock2");
        assert_eq!(mock2.info.driver.name, "mock");
        assert!(registry.resolve(Some("nope")).is_err());
    }

    #[test]
    fn inspect_reports_driver_defaults() {
        let info = registry(THREE_SERVICES)
            .service_inspect("mock2")
            .expect("mock2");
        assert_eq!(info.name, "mock2");
        assert_eq!(info.driver.name, "mock");
        assert!(!info.driver.next_device.ignore);
        assert_eq!(info.driver.next_device.prefix, "xvd");
        assert_eq!(info.driver.next_device.pattern, r"\w");
    }

    #[test]
    fn unknown_service_is_not_found() {
        let err = registry(THREE_SERVICES)
            .service_inspect("nope")
            .expect_err("unknown service");
        assert_eq!(err.kind, StorageErrorKind::NotFound);
    }

    #[test]
    fn empty_config_lists_nothing() {
        let registry = registry("storage: {}\n");
        assert!(registry.services_list().is_empty());
        let err = registry.resolve(None).err().expect("no default");
        assert_eq!(err.kind, StorageErrorKind::InvalidInput);
    }

    #[test]
    fn unknown_driver_fails_build() {
        let config = StorageConfig::from_yaml("storage:\n  driver: ebs\n").expect("config");
        let result = ServiceRegistry::build(&config, &DriverRegistry::builtin());
        assert!(matches!(result, Err(ServiceError::UnknownDriver { .. })));
    }

    #[tokio::test]
    async fn services_do_not_share_driver_state() {
        let registry = registry(THREE_SERVICES);
        let mock = registry.resolve(Some("mock")).expect("mock");
        let mock2 = registry.resolve(Some("mock2")).expect("mock2");

        mock.driver.volume_remove("vol-000").await.expect("remove");
        mock2
            .driver
            .volume_inspect("vol-000", &VolumesOpts::default())
            .await
            .expect("vol-000 still present in mock2");
    }
}
