use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KeyValueStore, Result};

pub struct InMemoryKeyValueStore(Mutex<HashMap<String, String>>);

impl InMemoryKeyValueStore {
    pub fn new() -> Self { Self(Mutex::new(HashMap::new())) }
}
impl Default for InMemoryKeyValueStore {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.0.lock().await.get(key).cloned())
    }

    async fn store(&self, key: &str, value: String) -> Result<()> {
        self.0.lock().await.insert(key.to_string(), value);

        Ok(())
    }
}
