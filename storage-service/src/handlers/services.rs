// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use storage_types::ServiceInfo;

use crate::error::Result;
use crate::server::AppState;

pub async fn list(State(state): State<AppState>) -> Json<BTreeMap<String, ServiceInfo>> {
    Json(state.lifecycle.services().services_list())
}

pub async fn inspect(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceInfo>> {
    Ok(Json(state.lifecycle.services().service_inspect(&name)?))
}
