use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use veloo_core::{KeyValueStore, KeyValueStoreError};

type Entries = BTreeMap<String, String>;

/// Key-value store kept as a single JSON object on disk.
///
/// Every write replaces the whole file through a sibling temp file and a
/// rename, so a crash mid-write leaves the previous contents in place.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, KeyValueStoreError> {
        let bytes = match tokio::fs::read(self.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(KeyValueStoreError::Unavailable(e.to_string())),
        };
        if bytes.is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            KeyValueStoreError::UnexpectedError(format!("{}: {e}", self.path().display()))
        })
    }

    // Writers start over from an empty object when the file is unreadable JSON.
    async fn entries_for_update(&self) -> Result<Entries, KeyValueStoreError> {
        match self.read_entries().await {
            Err(KeyValueStoreError::UnexpectedError(reason)) => {
                tracing::warn!(%reason, "Replacing unreadable key-value file");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), KeyValueStoreError> {
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| KeyValueStoreError::UnexpectedError(e.to_string()))?;

        if let Some(parent) = self.path().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| KeyValueStoreError::Unavailable(e.to_string()))?;
            }
        }

        let temp_path = temp_path(self.path());
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| KeyValueStoreError::Unavailable(e.to_string()))?;
        tokio::fs::rename(&temp_path, self.path())
            .await
            .map_err(|e| KeyValueStoreError::Unavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    #[tracing::instrument(name = "FileKeyValueStore::set", skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.entries_for_update().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    #[tracing::instrument(name = "FileKeyValueStore::remove", skip(self))]
    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.entries_for_update().await?;
        entries.remove(key);
        self.write_entries(&entries).await
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
