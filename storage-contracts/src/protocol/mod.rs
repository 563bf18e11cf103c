// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod id;

pub use error::{ErrorEnvelope, RESOURCE_NOT_FOUND, StorageError, StorageErrorKind};
pub use id::RequestId;
