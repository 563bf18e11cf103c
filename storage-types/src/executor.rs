// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Host operating system (as in `std::env::consts::OS`) to executor name.
///
/// Exactly these names are ever registered or requested; there is no
/// generic fallback executor.
pub const PLATFORM_EXECUTORS: [(&str, &str); 3] = [
    ("linux", "lsx-linux"),
    ("macos", "lsx-darwin"),
    ("windows", "lsx-windows.exe"),
];

/// Metadata for one published executor binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorInfo {
    pub name: String,

    /// Content length in bytes
    pub size: u64,

    /// Lower-case hex SHA-256 of the content
    pub checksum: String,
}

pub fn executor_name_for_os(os: &str) -> Option<&'static str> {
    PLATFORM_EXECUTORS
        .iter()
        .find(|(platform, _)| *platform == os)
        .map(|(_, name)| *name)
}

pub fn is_platform_executor(name: &str) -> bool {
    PLATFORM_EXECUTORS.iter().any(|(_, known)| *known == name)
}
