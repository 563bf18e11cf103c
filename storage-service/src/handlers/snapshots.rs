// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use storage_types::{Snapshot, SnapshotCopyRequest, Volume, VolumeCreateRequest};

use super::{ServiceQuery, body, query};
use crate::error::Result;
use crate::server::AppState;

pub async fn list(
    State(state): State<AppState>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<Json<BTreeMap<String, Vec<Snapshot>>>> {
    let params = query(params)?;
    Ok(Json(state.lifecycle.snapshots(params.service()).await?))
}

pub async fn inspect(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<Json<Snapshot>> {
    let params = query(params)?;
    let snapshot = state
        .lifecycle
        .snapshot_inspect(params.service(), &snapshot_id)
        .await?;
    Ok(Json(snapshot))
}

/// Create a volume from the snapshot
pub async fn create_volume(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
    request: std::result::Result<Json<VolumeCreateRequest>, JsonRejection>,
) -> Result<Json<Volume>> {
    let params = query(params)?;
    let request = body(request)?;
    let volume = state
        .lifecycle
        .snapshot_create(params.service(), &snapshot_id, &request)
        .await?;
    Ok(Json(volume))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<StatusCode> {
    let params = query(params)?;
    state
        .lifecycle
        .snapshot_remove(params.service(), &snapshot_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn copy(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
    request: std::result::Result<Json<SnapshotCopyRequest>, JsonRejection>,
) -> Result<Json<Snapshot>> {
    let params = query(params)?;
    let request = body(request)?;
    let snapshot = state
        .lifecycle
        .snapshot_copy(params.service(), &snapshot_id, &request)
        .await?;
    Ok(Json(snapshot))
}
