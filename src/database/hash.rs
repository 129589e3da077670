//! MD5 digest of executable content
//!
//! Profiles are keyed by the uppercase hex MD5 of the executable.

use std::path::Path;

use md5::{Digest, Md5};
use tokio::io::AsyncReadExt;

use crate::database::error::StorageError;

const READ_BUFFER_SIZE: usize = 64 * 1024;

pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode_upper(Md5::digest(bytes))
}

/// Streams the file at `path` through MD5
pub async fn compute_md5(path: &Path) -> Result<String, StorageError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;

    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode_upper(hasher.finalize()))
}
