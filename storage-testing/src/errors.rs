use std::path::PathBuf;

use storage_contracts::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestingError {
    #[error("fixture io error for {path:?}: {reason}")]
    FixtureIo { path: PathBuf, reason: String },
    #[error("service startup failed: {reason}")]
    ServiceStartupFailed { reason: String },
    #[error("client error: {0}")]
    Client(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, TestingError>;
