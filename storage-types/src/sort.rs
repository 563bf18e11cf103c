// SPDX-License-Identifier: GPL-3.0-only

//! Deterministic ordering for listings, independent of backend storage order

use crate::{Snapshot, Volume};

/// Sort volumes ascending by ID.
pub fn sort_volumes_by_id(volumes: &mut [Volume]) {
    volumes.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Sort snapshots ascending by ID.
pub fn sort_snapshots_by_id(snapshots: &mut [Snapshot]) {
    snapshots.sort_by(|a, b| a.id.cmp(&b.id));
}
