// SPDX-License-Identifier: GPL-3.0-only

//! Facts reported for the in-memory `mock` driver
//!
//! The service side of the mock driver reads the same constants so that
//! both ends agree on instance identity and attachments.

use std::collections::BTreeMap;

use anyhow::Result;
use storage_types::{InstanceId, LocalDevices};

use crate::LocalDriver;

pub const DRIVER_NAME: &str = "mock";
pub const INSTANCE_ID: &str = "mock-instance-000";
pub const AVAILABILITY_ZONE: &str = "zone-000";

/// Device already attached on a mock host, and the volume behind it
pub const ATTACHED_DEVICE: (&str, &str) = ("/dev/xvda", "vol-000");

pub fn instance_id() -> InstanceId {
    InstanceId {
        id: INSTANCE_ID.to_string(),
        driver: DRIVER_NAME.to_string(),
        fields: BTreeMap::from([("zone".to_string(), AVAILABILITY_ZONE.to_string())]),
    }
}

pub fn local_devices() -> LocalDevices {
    let (device, volume) = ATTACHED_DEVICE;
    LocalDevices {
        driver: DRIVER_NAME.to_string(),
        device_map: BTreeMap::from([(device.to_string(), volume.to_string())]),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockLocalDriver;

impl LocalDriver for MockLocalDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn instance_id(&self) -> Result<InstanceId> {
        Ok(instance_id())
    }

    fn local_devices(&self) -> Result<LocalDevices> {
        Ok(local_devices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_types::NextDeviceInfo;

    #[test]
    fn instance_id_is_stable() {
        let id = MockLocalDriver.instance_id().expect("instance id");
        assert_eq!(id.id, "mock-instance-000");
        assert_eq!(id.driver, "mock");
        assert_eq!(id, instance_id());
    }

    #[test]
    fn next_device_skips_attached_volume() {
        let naming = NextDeviceInfo {
            ignore: false,
            prefix: "xvd".to_string(),
            pattern: r"\w".to_string(),
        };
        let next = MockLocalDriver.next_device(&naming).expect("next device");
        assert_eq!(next.as_deref(), Some("/dev/xvdb"));
    }
}
