//! File system backed by tokio::fs

use std::path::Path;

use crate::database::error::StorageError;
use crate::database::file_system::FileSystem;

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

#[async_trait::async_trait]
impl FileSystem for OsFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8(path.to_path_buf()))
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| StorageError::io(path, e))
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        // Read and write separately so a failure names the path that caused it
        let contents = self.read(from).await?;
        self.write(to, &contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_then_read_to_string_returns_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("current.json");
        let fs = OsFileSystem;

        fs.write(&path, br#"{"DbVersion": 1}"#).await.unwrap();

        assert!(fs.exists(&path).await);
        assert_eq!(
            fs.read_to_string(&path).await.unwrap(),
            r#"{"DbVersion": 1}"#
        );
    }

    #[tokio::test]
    async fn read_missing_file_returns_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        let result = OsFileSystem.read(&path).await;

        assert!(matches!(result, Err(StorageError::NotFound(p)) if p == path));
    }

    #[tokio::test]
    async fn copy_missing_source_reports_source_path() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("3").join("version.json");
        let to = temp_dir.path().join("current.json");

        let result = OsFileSystem.copy(&from, &to).await;

        assert!(matches!(result, Err(StorageError::NotFound(p)) if p == from));
    }

    #[tokio::test]
    async fn copy_into_missing_directory_reports_destination_path() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("version.json");
        let to = temp_dir.path().join("missing").join("current.json");
        let fs = OsFileSystem;
        fs.write(&from, b"{}").await.unwrap();

        let result = fs.copy(&from, &to).await;

        assert!(matches!(result, Err(StorageError::NotFound(p)) if p == to));
    }

    #[tokio::test]
    async fn copy_overwrites_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("version.json");
        let to = temp_dir.path().join("current.json");
        let fs = OsFileSystem;

        fs.write(&from, b"new").await.unwrap();
        fs.write(&to, b"old contents").await.unwrap();
        fs.copy(&from, &to).await.unwrap();

        assert_eq!(fs.read(&to).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn create_dir_all_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("99").join("ExeProfiles");

        OsFileSystem.create_dir_all(&nested).await.unwrap();

        assert!(nested.is_dir());
    }
}
