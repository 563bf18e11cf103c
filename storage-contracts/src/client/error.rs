// SPDX-License-Identifier: GPL-3.0-only

//! Normalization of every client-side failure into `StorageError`

use storage_sys::SysError;

use crate::{ErrorEnvelope, StorageError, StorageErrorKind};

/// Decode an error response body, falling back to the status code when the
/// body is not an envelope (e.g. a proxy error page or an empty HEAD reply).
pub(crate) fn error_from_body(status: u16, body: &str) -> StorageError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.into(),
        Err(_) => StorageError::new(StorageErrorKind::from_code(status), body.trim()),
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorageError::new(StorageErrorKind::Timeout, format!("Request timed out: {err}"))
        } else if err.is_decode() {
            StorageError::internal(format!("Failed to decode response: {err}"))
        } else {
            StorageError::new(
                StorageErrorKind::Unavailable,
                format!("Storage service unreachable: {err}"),
            )
        }
    }
}

impl From<SysError> for StorageError {
    fn from(err: SysError) -> Self {
        match err {
            SysError::Timeout { .. } => StorageError::new(StorageErrorKind::Timeout, err.to_string()),
            _ => StorageError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn envelope_body_wins_over_status() {
        let err = error_from_body(500, r#"{"status":404,"message":"resource not found"}"#);
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.message, "resource not found");
    }

    #[test]
    fn plain_body_is_classified_by_status() {
        let err = error_from_body(502, "Bad Gateway\n");
        assert_eq!(err.kind, StorageErrorKind::Unavailable);
        assert_eq!(err.message, "Bad Gateway");

        let err = error_from_body(404, "");
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.message, "resource not found");
    }

    #[test]
    fn executor_timeout_maps_to_timeout_kind() {
        let err = StorageError::from(SysError::Timeout {
            path: "lsx-linux".into(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(err.kind, StorageErrorKind::Timeout);
        assert_eq!(err.status(), 504);
    }
}
