// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Lower-case hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Size and checksum of the file at `path`, or `None` if it does not exist
pub async fn file_checksum(path: &Path) -> Result<Option<(u64, String)>> {
    match tokio::fs::read(path).await {
        Ok(content) => Ok(Some((content.len() as u64, sha256_hex(&content)))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
