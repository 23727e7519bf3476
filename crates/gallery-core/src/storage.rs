//! Key/value blob storage for the persisted selection.
//!
//! The selection store only sees the [`SelectionStorage`] trait; which
//! backend sits behind it (files, memory, a background writer) is decided by
//! the caller.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage writer has shut down")]
    Closed,
}

/// An opaque string blob store addressed by key.
pub trait SelectionStorage: Send + Sync {
    /// Read the blob under `key`. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform data directory: `<data_dir>/artic-gallery/`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("artic-gallery"))
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SelectionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash mid-write leaves the previous blob intact.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process storage, used by tests and `--no-persist`.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SelectionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage whose writes are handed to a background task.
///
/// `set` never touches the disk; it queues the blob and returns. The writer
/// task coalesces queued writes so only the latest blob per key is written.
/// Reads go straight to the inner storage.
pub struct ChannelStorage {
    inner: Arc<dyn SelectionStorage>,
    tx: mpsc::UnboundedSender<(String, String)>,
}

impl ChannelStorage {
    /// Spawn the writer task on the current tokio runtime.
    ///
    /// The task exits once every `ChannelStorage` handle is dropped and the
    /// queue is flushed; await the returned handle to make sure the last
    /// write landed.
    pub fn spawn(inner: Arc<dyn SelectionStorage>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<(String, String)>();
        let writer = Arc::clone(&inner);

        let handle = tokio::spawn(async move {
            while let Some((key, value)) = rx.recv().await {
                let mut pending = HashMap::new();
                pending.insert(key, value);
                while let Ok((key, value)) = rx.try_recv() {
                    pending.insert(key, value);
                }

                let target = Arc::clone(&writer);
                let written = tokio::task::spawn_blocking(move || {
                    for (key, value) in pending {
                        if let Err(e) = target.set(&key, &value) {
                            tracing::warn!(key = %key, error = %e, "failed to persist selection");
                        }
                    }
                })
                .await;
                if let Err(e) = written {
                    tracing::warn!(error = %e, "storage writer task panicked");
                }
            }
            tracing::debug!("storage writer finished");
        });

        (Self { inner, tx }, handle)
    }
}

impl SelectionStorage for ChannelStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.tx
            .send((key.to_string(), value.to_string()))
            .map_err(|_| StorageError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get("selectedArtworks").unwrap().is_none());
    }

    #[test]
    fn file_storage_round_trip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        storage.set("selectedArtworks", "[1,2]").unwrap();
        storage.set("selectedArtworks", "[3]").unwrap();
        assert_eq!(storage.get("selectedArtworks").unwrap().as_deref(), Some("[3]"));
        assert!(dir.path().join("nested").join("selectedArtworks.json").exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn channel_storage_flushes_latest_write_on_drop() {
        let inner = Arc::new(MemoryStorage::new());
        let (storage, handle) = ChannelStorage::spawn(inner.clone());

        storage.set("k", "first").unwrap();
        storage.set("k", "second").unwrap();
        storage.set("other", "x").unwrap();
        drop(storage);
        handle.await.unwrap();

        assert_eq!(inner.get("k").unwrap().as_deref(), Some("second"));
        assert_eq!(inner.get("other").unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn channel_storage_reads_from_inner() {
        let inner = Arc::new(MemoryStorage::new());
        inner.set("k", "stored").unwrap();
        let (storage, _handle) = ChannelStorage::spawn(inner);
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("stored"));
    }
}
