//! In-memory file system for tests and dry runs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::database::error::StorageError;
use crate::database::file_system::FileSystem;

#[derive(Debug, Default)]
struct State {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl State {
    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            None => true,
            Some(parent) if parent.as_os_str().is_empty() || parent.parent().is_none() => true,
            Some(parent) => self.dirs.contains(parent),
        }
    }
}

/// File system that keeps every file in a map
///
/// Behaves like a real disk where it matters to the database: writes fail
/// when the parent directory was never created.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<State>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a file, creating its parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            state.add_dir_all(parent);
        }
        state.files.insert(path.to_path_buf(), contents.into());
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.lock().files.contains_key(path.as_ref())
    }

    pub fn dir_exists(&self, path: impl AsRef<Path>) -> bool {
        self.lock().dirs.contains(path.as_ref())
    }

    /// Paths of every stored file, sorted
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = self.lock().files.keys().cloned().collect();
        files.sort();
        files
    }
}

#[async_trait::async_trait]
impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        self.lock().add_dir_all(path);
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8(path.to_path_buf()))
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        let mut state = self.lock();
        if !state.parent_exists(path) {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        let mut state = self.lock();
        let contents = state
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(from.to_path_buf()))?;
        if !state.parent_exists(to) {
            return Err(StorageError::NotFound(to.to_path_buf()));
        }
        state.files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}
