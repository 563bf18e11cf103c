// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::Opts;

/// Point-in-time capture of a volume.
///
/// A snapshot outlives the volume it was taken from; `volume_id` is a
/// back-reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    pub volume_id: String,

    /// Size of the source volume when the snapshot was taken
    #[serde(default)]
    pub volume_size: i64,

    #[serde(default)]
    pub status: String,

    /// Unix timestamp (seconds)
    #[serde(default)]
    pub start_time: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Opts::is_empty")]
    pub opts: Opts,
}
