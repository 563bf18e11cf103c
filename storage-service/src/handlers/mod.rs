// SPDX-License-Identifier: GPL-3.0-only

//! HTTP handlers, one module per resource

pub mod executors;
pub mod services;
pub mod snapshots;
pub mod volumes;

use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde::Deserialize;
use storage_types::VolumesOpts;

use crate::error::ServiceError;

/// Query parameters shared by volume and snapshot routes
#[derive(Debug, Default, Deserialize)]
pub struct ServiceQuery {
    /// Target service; the default service when absent
    pub service: Option<String>,

    #[serde(default)]
    pub attachments: bool,
}

impl ServiceQuery {
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn volumes_opts(&self) -> VolumesOpts {
        VolumesOpts {
            attachments: self.attachments,
        }
    }
}

/// Unwrap an extracted query, turning a malformed one into an invalid-input error
pub(crate) fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ServiceError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ServiceError::InvalidArgument(rejection.body_text()))
}

/// Unwrap an extracted JSON body, turning a malformed one into an invalid-input error
pub(crate) fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ServiceError::InvalidArgument(rejection.body_text()))
}
