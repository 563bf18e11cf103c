//! End-to-end harness for the storage service
//!
//! Tests start a real server on an ephemeral port, publish fixture executors
//! and talk to it only through the client SDK.

pub mod errors;
pub mod fixtures;
pub mod harness;

pub use harness::{FlakyExecutorServer, StalledServer, TestServer};
