// SPDX-License-Identifier: GPL-3.0-only

//! Low-level host operations for executor distribution
//!
//! This crate provides the host-side primitives the client needs to run
//! platform executors:
//! - Content checksums
//! - An on-disk executor cache with atomic replacement
//! - Subprocess invocation with a bounded timeout
//!
//! Nothing in here knows about HTTP or drivers.

pub mod cache;
pub mod checksum;
pub mod error;
pub mod process;

pub use cache::{CachedExecutor, ExecutorCache};
pub use checksum::{file_checksum, sha256_hex};
pub use error::{Result, SysError};
pub use process::invoke;
