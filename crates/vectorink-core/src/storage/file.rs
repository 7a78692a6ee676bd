//! File-based storage backend for native platforms.

use super::{BoxFuture, StorageBackend, StorageError, StorageResult, STORAGE_KEY};
use std::fs;
use std::path::PathBuf;

/// Stores the collection payload as a single JSON file.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend writing to the given file, creating parent
    /// directories as needed.
    pub fn new(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Backend(format!("failed to create storage directory: {}", e))
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Backend in the platform data directory, named after the one storage
    /// key the collection lives under.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Backend("could not determine home directory".to_string()))?;
        Self::new(base.join("vectorink").join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.path.clone();
        Box::pin(async move {
            if !path.exists() {
                return Ok(None);
            }
            fs::read_to_string(&path)
                .map(Some)
                .map_err(|e| StorageError::Backend(format!("failed to read {}: {}", path.display(), e)))
        })
    }

    fn write(&self, payload: String) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            fs::write(&path, payload).map_err(|e| {
                StorageError::Backend(format!("failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.path.clone();
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Backend(format!("failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}
