// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RESOURCE_NOT_FOUND: &str = "resource not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorKind {
    InvalidInput,
    NotFound,
    MethodNotAllowed,
    ExecutorNotFound,
    ChecksumMismatch,
    Unsupported,
    Timeout,
    Unavailable,
    Internal,
}

impl StorageErrorKind {
    pub fn code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::ExecutorNotFound => 404,
            Self::ChecksumMismatch => 502,
            Self::Unsupported => 501,
            Self::Timeout => 504,
            Self::Unavailable => 503,
            Self::Internal => 500,
        }
    }

    /// Best-effort inverse of [`code`](Self::code) for statuses read off the wire.
    ///
    /// 404 always decodes as `NotFound`; callers that know they addressed an
    /// executor refine it to `ExecutorNotFound`. Checksum mismatches are only
    /// ever raised client-side, so 502 decodes as a gateway failure.
    pub fn from_code(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            501 => Self::Unsupported,
            502 | 503 => Self::Unavailable,
            504 => Self::Timeout,
            400..=499 => Self::InvalidInput,
            _ => Self::Internal,
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid request",
            Self::NotFound => RESOURCE_NOT_FOUND,
            Self::MethodNotAllowed => "method not allowed",
            Self::ExecutorNotFound => "executor not found",
            Self::ChecksumMismatch => "executor checksum mismatch",
            Self::Unsupported => "operation not supported",
            Self::Timeout => "operation timed out",
            Self::Unavailable => "service unavailable",
            Self::Internal => "internal error",
        }
    }
}

/// The one error type that crosses the client boundary.
///
/// `Display` is the bare message so callers see exactly what the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };
        Self { kind, message }
    }

    /// A volume, snapshot or service that does not exist
    pub fn resource_not_found() -> Self {
        Self::new(StorageErrorKind::NotFound, RESOURCE_NOT_FOUND)
    }

    pub fn method_not_allowed(method: &str, path: &str) -> Self {
        Self::new(
            StorageErrorKind::MethodNotAllowed,
            format!("method not allowed: {method} {path}"),
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::InvalidInput, message)
    }

    pub fn unsupported(operation: &str) -> Self {
        Self::new(
            StorageErrorKind::Unsupported,
            format!("operation not supported: {operation}"),
        )
    }

    pub fn executor_not_found(name: &str) -> Self {
        Self::new(
            StorageErrorKind::ExecutorNotFound,
            format!("executor not found: {name}"),
        )
    }

    pub fn checksum_mismatch(name: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            StorageErrorKind::ChecksumMismatch,
            format!("executor {name} checksum mismatch: expected {expected}, got {actual}"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::Internal, message)
    }

    pub fn status(&self) -> u16 {
        self.kind.code()
    }
}

/// Wire shape of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub message: String,
}

impl From<&StorageError> for ErrorEnvelope {
    fn from(error: &StorageError) -> Self {
        Self {
            status: error.status(),
            message: error.message.clone(),
        }
    }
}

impl From<StorageError> for ErrorEnvelope {
    fn from(error: StorageError) -> Self {
        Self {
            status: error.status(),
            message: error.message,
        }
    }
}

impl From<ErrorEnvelope> for StorageError {
    fn from(envelope: ErrorEnvelope) -> Self {
        StorageError::new(StorageErrorKind::from_code(envelope.status), envelope.message)
    }
}
