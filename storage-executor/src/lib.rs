// SPDX-License-Identifier: GPL-3.0-only

//! Host-local side of each storage driver
//!
//! The `lsx` binary is what clients download and run on their own host. Each
//! driver contributes a [`LocalDriver`] that reports facts only the host can
//! know: its instance identity, the devices it has attached and the next free
//! device name.

pub mod device;
pub mod mock;

use anyhow::Result;
use storage_types::{InstanceId, LocalDevices, NextDeviceInfo};

pub use device::next_device_name;
pub use mock::MockLocalDriver;

pub trait LocalDriver: Send + Sync {
    fn name(&self) -> &str;

    fn instance_id(&self) -> Result<InstanceId>;

    fn local_devices(&self) -> Result<LocalDevices>;

    /// Next unused device path following `naming`, `None` when all are taken
    fn next_device(&self, naming: &NextDeviceInfo) -> Result<Option<String>> {
        let devices = self.local_devices()?;
        next_device_name(devices.device_map.keys(), &naming.prefix, &naming.pattern)
    }
}

/// Local driver compiled into this executor under `name`
pub fn local_driver(name: &str) -> Option<Box<dyn LocalDriver>> {
    match name {
        mock::DRIVER_NAME => Some(Box::new(MockLocalDriver)),
        _ => None,
    }
}
