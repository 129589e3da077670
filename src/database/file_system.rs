//! Storage trait for reading and writing database files

use std::path::Path;

use crate::database::error::StorageError;

/// Trait for the file operations the database needs
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns true if a file or directory exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and any missing parents
    async fn create_dir_all(&self, path: &Path) -> Result<(), StorageError>;

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    async fn read_to_string(&self, path: &Path) -> Result<String, StorageError>;

    /// Creates or truncates the file at `path`. The parent directory must exist.
    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError>;

    /// Copies `from` to `to`, overwriting `to`
    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StorageError>;
}
