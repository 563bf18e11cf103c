// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use storage_contracts::{EXECUTOR_CHECKSUM_HEADER, EXECUTOR_SIZE_HEADER};
use storage_types::ExecutorInfo;

use crate::error::Result;
use crate::server::AppState;

fn metadata_headers(info: &ExecutorInfo) -> [(&'static str, String); 2] {
    [
        (EXECUTOR_SIZE_HEADER, info.size.to_string()),
        (EXECUTOR_CHECKSUM_HEADER, info.checksum.clone()),
    ]
}

pub async fn list(State(state): State<AppState>) -> Json<BTreeMap<String, ExecutorInfo>> {
    Json(state.executors.list())
}

/// Metadata only; the body stays empty
pub async fn head(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let (info, _) = state.executors.executor_info_inspect(&name, false).await?;
    Ok(metadata_headers(&info))
}

pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let (info, content) = state.executors.executor_info_inspect(&name, true).await?;
    tracing::debug!("Serving executor {} ({} bytes)", info.name, info.size);
    Ok((
        metadata_headers(&info),
        [("content-type", "application/octet-stream")],
        content.unwrap_or_default(),
    ))
}
