// SPDX-License-Identifier: GPL-3.0-only

//! Request bodies for mutating operations

use serde::{Deserialize, Serialize};

use crate::Opts;

/// Attributes for a new volume, either blank or materialized from a snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeCreateRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iops: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,

    #[serde(default)]
    pub opts: Opts,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeSnapshotRequest {
    pub snapshot_name: String,
    #[serde(default)]
    pub opts: Opts,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotCopyRequest {
    pub snapshot_name: String,
    #[serde(default)]
    pub opts: Opts,
}

/// Filter options for volume listing and inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VolumesOpts {
    /// Include attachment records
    #[serde(default)]
    pub attachments: bool,
}
