// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the storage service
//!
//! These types are shared by every layer of the stack:
//!
//! - **storage-service**: drivers return them, the HTTP layer serializes them
//! - **storage-contracts**: the client SDK decodes them from the wire
//! - **storage-executor**: emits the local fact records on stdout
//!
//! `Opts` values are opaque to everything except the driver that consumes them.

pub mod executor;
pub mod instance;
pub mod opts;
pub mod requests;
pub mod service;
pub mod snapshot;
pub mod sort;
pub mod volume;

pub use executor::{ExecutorInfo, PLATFORM_EXECUTORS, executor_name_for_os, is_platform_executor};
pub use instance::{InstanceId, LocalDevices, NextDevice};
pub use opts::{OptValue, Opts};
pub use requests::{SnapshotCopyRequest, VolumeCreateRequest, VolumeSnapshotRequest, VolumesOpts};
pub use service::{DriverInfo, NextDeviceInfo, ServiceInfo};
pub use snapshot::Snapshot;
pub use sort::{sort_snapshots_by_id, sort_volumes_by_id};
pub use volume::{Volume, VolumeAttachment};
