// SPDX-License-Identifier: GPL-3.0-only

pub mod client;
pub mod protocol;
pub mod traits;

pub use client::{ClientConfig, StorageClient};
pub use protocol::{ErrorEnvelope, RESOURCE_NOT_FOUND, RequestId, StorageError, StorageErrorKind};
pub use traits::Driver;

/// Response headers carrying executor metadata on `HEAD`/`GET /executors/{name}`
pub const EXECUTOR_SIZE_HEADER: &str = "x-storage-executor-size";
pub const EXECUTOR_CHECKSUM_HEADER: &str = "x-storage-executor-checksum";
