// SPDX-License-Identifier: GPL-3.0-only

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use storage_contracts::{ErrorEnvelope, StorageError, StorageErrorKind};
use storage_sys::SysError;
use thiserror::Error;

/// Service-specific errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service {service} uses unknown driver {driver}")]
    UnknownDriver { service: String, driver: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("System error: {0}")]
    Sys(#[from] SysError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ServiceError> for StorageError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(inner) => inner,
            ServiceError::InvalidArgument(msg) => StorageError::invalid_input(msg),
            ServiceError::Sys(SysError::Timeout { .. }) => {
                StorageError::new(StorageErrorKind::Timeout, err.to_string())
            }
            _ => StorageError::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        envelope_response(StorageError::from(self))
    }
}

/// Render a `StorageError` as the wire envelope
pub fn envelope_response(error: StorageError) -> Response {
    let envelope = ErrorEnvelope::from(error);
    let status =
        StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!("Request failed: {} {}", envelope.status, envelope.message);
    } else {
        tracing::debug!("Request rejected: {} {}", envelope.status, envelope.message);
    }
    (status, Json(envelope)).into_response()
}

pub type Result<T> = std::result::Result<T, ServiceError>;
