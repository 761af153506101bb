use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KeyValueStore, RepositoryError, Result};

/// keeps every key in a single json object file, replaced atomically on each write.
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(RepositoryError::Corrupt),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;

        Ok(self.read_all().await?.remove(key))
    }

    async fn store(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);

        tracing::trace!("writing {} entries to {}", entries.len(), self.path.display());
        self.write_all(&entries).await
    }
}
