use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{client::KeyValueClient, metric, types};

/// Process-local key-value store. Reads and writes never fail.
#[derive(Default)]
pub struct MemoryClient {
    store: DashMap<String, types::Value>,
}

#[async_trait]
impl KeyValueClient for MemoryClient {
    async fn read(&self, key: &str) -> types::Result<Option<types::Value>> {
        let value = self.store.get(key).map(|data| data.value().clone());

        let outcome = if value.is_some() { "ok" } else { "absent" };
        metric::kv_read_count_metric()
            .with_label_values(&["memory", outcome])
            .inc();

        tracing::trace!("memory read for key: '{}', outcome: {}", key, outcome);

        Ok(value)
    }

    async fn write(&self, key: &str, value: &[u8]) -> types::Result<()> {
        self.store.insert(key.to_string(), value.to_vec());

        metric::kv_write_count_metric()
            .with_label_values(&["memory", "ok"])
            .inc();

        tracing::trace!("memory write for key: '{}', size: {}", key, value.len());

        Ok(())
    }
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Builds a client pre-populated with the given pairs.
    pub fn with_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<types::Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let obj = Self::new();

        for (key, value) in entries {
            obj.store.insert(key.into(), value.into());
        }

        obj
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn remove(&self, key: &str) -> Option<types::Value> {
        self.store.remove(key).map(|(_, value)| value)
    }
}
