// SPDX-License-Identifier: GPL-3.0-only

//! Storage orchestration service
//!
//! Binds configured services to driver instances, runs the volume and
//! snapshot lifecycle against them and publishes the platform executors,
//! all over a small HTTP surface.

pub mod adapters;
pub mod config;
pub mod error;
pub mod executors;
pub mod handlers;
pub mod lifecycle;
pub mod logging;
pub mod routing;
pub mod server;

pub use config::StorageConfig;
pub use error::{Result, ServiceError};
pub use routing::{DriverRegistry, ServiceRegistry};
pub use server::{AppState, router, serve};
