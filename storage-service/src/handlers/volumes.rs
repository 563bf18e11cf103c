// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use storage_types::{Snapshot, Volume, VolumeCreateRequest, VolumeSnapshotRequest};

use super::{ServiceQuery, body, query};
use crate::error::Result;
use crate::server::AppState;

pub async fn list(
    State(state): State<AppState>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<Json<BTreeMap<String, Vec<Volume>>>> {
    let params = query(params)?;
    let listing = state
        .lifecycle
        .volumes(params.service(), &params.volumes_opts())
        .await?;
    Ok(Json(listing))
}

pub async fn inspect(
    State(state): State<AppState>,
    Path(volume_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<Json<Volume>> {
    let params = query(params)?;
    let volume = state
        .lifecycle
        .volume_inspect(params.service(), &volume_id, &params.volumes_opts())
        .await?;
    Ok(Json(volume))
}

pub async fn create(
    State(state): State<AppState>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
    request: std::result::Result<Json<VolumeCreateRequest>, JsonRejection>,
) -> Result<Json<Volume>> {
    let params = query(params)?;
    let request = body(request)?;
    let volume = state
        .lifecycle
        .volume_create(params.service(), &request)
        .await?;
    Ok(Json(volume))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(volume_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
) -> Result<StatusCode> {
    let params = query(params)?;
    state
        .lifecycle
        .volume_remove(params.service(), &volume_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn snapshot(
    State(state): State<AppState>,
    Path(volume_id): Path<String>,
    params: std::result::Result<Query<ServiceQuery>, QueryRejection>,
    request: std::result::Result<Json<VolumeSnapshotRequest>, JsonRejection>,
) -> Result<Json<Snapshot>> {
    let params = query(params)?;
    let request = body(request)?;
    let snapshot = state
        .lifecycle
        .volume_snapshot(params.service(), &volume_id, &request)
        .await?;
    Ok(Json(snapshot))
}
