//! Key-value persistence with pluggable backends
//!
//! # Architecture
//!
//! - `KeyValueStore` trait: async get/set/remove on string keys and values
//! - `MemoryStore`: in-process map, used in tests and ephemeral sessions
//! - `FileStore`: a single JSON object file on disk, used by the CLI
//!
//! Stores report failures as errors. Callers that treat persistence as
//! best-effort (the icon state store) decide whether to swallow them.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Async string key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key is unset
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; removing an unset key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Store backed by one JSON object file
///
/// Every write rewrites the whole file. The internal lock serializes writers
/// within this process only; separate processes sharing a file can still
/// overwrite each other.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default location (~/.local/share/tint/icon-state.json on Linux)
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tint")
            .join("icon-state.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::Store(format!(
                "Corrupt store file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Map to modify for a write; a corrupt file is replaced rather than
    /// blocking every later write
    async fn read_map_for_write(&self) -> Result<BTreeMap<String, String>> {
        match self.read_map().await {
            Err(Error::Store(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    /// Write via a temp file in the same directory and rename over the
    /// target, so readers never see a partial file
    async fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                tokio::fs::create_dir_all(parent).await?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let content = serde_json::to_string_pretty(map)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut temp = NamedTempFile::new_in(&parent)?;
            temp.write_all(content.as_bytes())?;
            temp.as_file().sync_all()?;
            temp.persist(&path).map_err(|e| e.error)?;
            debug!("Wrote store file: {}", path.display());
            Ok(())
        })
        .await
        .map_err(|e| Error::Store(format!("Store write task failed: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_write().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_write().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}
