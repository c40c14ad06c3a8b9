use std::{collections::HashMap, sync::Arc};

use dashmap::DashMap;
use futures::stream::{FuturesUnordered, TryStreamExt};
use kvar_core::{errors::Error, types};
use serde::{de::DeserializeOwned, Serialize};

use crate::task::ResolveTask;

/// A locally tracked variable backed by a remote key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEntry {
    pub local_name: String,
    pub remote_key: String,
    /// Last value observed by the resolver, `None` until resolved or if the
    /// remote key is unset.
    pub value: Option<types::Value>,
}

impl VariableEntry {
    pub fn new(local_name: impl Into<String>, remote_key: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            remote_key: remote_key.into(),
            value: None,
        }
    }
}

/// Maps local variable names to remote keys and caches their values.
///
/// Clones share the same cache and client. Entries are never evicted.
#[derive(Clone)]
pub struct VariableResolver {
    client: types::SharedClient,
    entries: Arc<DashMap<String, VariableEntry>>,
}

impl VariableResolver {
    pub fn new(client: types::SharedClient) -> Self {
        Self {
            client,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Registers every `(local name, remote key)` pair and returns a task that
    /// fetches all of them when run.
    ///
    /// Registration happens immediately and clears any cached value for the
    /// given names. No remote call is made until the task is run.
    pub fn task<N, K, I>(&self, variables: I) -> ResolveTask
    where
        N: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (N, K)>,
    {
        let variables: Vec<(String, String)> = variables
            .into_iter()
            .map(|(name, key)| (name.into(), key.into()))
            .collect();

        for (name, key) in variables.iter() {
            self.entries
                .insert(name.clone(), VariableEntry::new(name.clone(), key.clone()));
        }

        tracing::debug!("registered {} variables", variables.len());

        ResolveTask::new(self.clone(), variables)
    }

    /// Cached value for `name`. Never touches the remote store.
    pub fn var(&self, name: &str) -> Option<types::Value> {
        self.entries
            .get(name)
            .and_then(|entry| entry.value().value.clone())
    }

    pub fn var_string(&self, name: &str) -> types::Result<Option<String>> {
        match self.var(name) {
            Some(data) => String::from_utf8(data)
                .map(Some)
                .map_err(|e| Error::ValueDecodeFailed {
                    name: name.to_string(),
                    message: "value is not valid utf-8".to_string(),
                    source: e.into(),
                }),
            None => Ok(None),
        }
    }

    pub fn var_json<T>(&self, name: &str) -> types::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.var(name) {
            Some(data) => serde_json::from_slice(&data)
                .map(Some)
                .map_err(|e| Error::ValueDecodeFailed {
                    name: name.to_string(),
                    message: "value is not valid json".to_string(),
                    source: e.into(),
                }),
            None => Ok(None),
        }
    }

    pub fn remote_key(&self, name: &str) -> Option<String> {
        self.entries
            .get(name)
            .map(|entry| entry.value().remote_key.clone())
    }

    pub fn entry(&self, name: &str) -> Option<VariableEntry> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn snapshot(&self) -> HashMap<String, Option<types::Value>> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetches `key` and caches it under the same name.
    pub async fn get_by_key(&self, key: &str) -> types::Result<Option<types::Value>> {
        self.get_by_path(key, key).await
    }

    /// Fetches `remote_key` and caches it under `local_name`. On failure the
    /// cache entry for `local_name` is left as it was.
    pub async fn get_by_path(
        &self,
        local_name: &str,
        remote_key: &str,
    ) -> types::Result<Option<types::Value>> {
        let value = self.client.read(remote_key).await?;

        self.store(local_name, remote_key, value.clone());

        Ok(value)
    }

    pub async fn set_by_key(&self, name: &str, value: impl AsRef<[u8]>) -> types::Result<()> {
        self.set_by_path(name, name, value).await
    }

    /// Writes `value` to `remote_key`, then caches it under `local_name`. On
    /// failure the cache entry for `local_name` is left as it was.
    pub async fn set_by_path(
        &self,
        local_name: &str,
        remote_key: &str,
        value: impl AsRef<[u8]>,
    ) -> types::Result<()> {
        let value = value.as_ref();

        self.client.write(remote_key, value).await?;

        self.store(local_name, remote_key, Some(value.to_vec()));

        Ok(())
    }

    pub async fn set_json_by_key<T>(&self, name: &str, value: &T) -> types::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value).map_err(|e| Error::ValueDecodeFailed {
            name: name.to_string(),
            message: "failed to encode value as json".to_string(),
            source: e.into(),
        })?;

        self.set_by_key(name, data).await
    }

    /// Reads every pair concurrently. Each value is cached as soon as its read
    /// completes, so a failed batch can leave earlier reads cached. Results are
    /// drained in completion order, so the first failing read ends the batch.
    pub(crate) async fn resolve(
        &self,
        variables: &[(String, String)],
    ) -> types::Result<HashMap<String, Option<types::Value>>> {
        let reads: FuturesUnordered<_> = variables
            .iter()
            .map(|(name, key)| async move {
                let value = self.client.read(key).await?;

                self.store(name, key, value.clone());

                Ok::<_, Error>((name.clone(), value))
            })
            .collect();

        reads.try_collect().await
    }

    fn store(&self, local_name: &str, remote_key: &str, value: Option<types::Value>) {
        self.entries.insert(
            local_name.to_string(),
            VariableEntry {
                local_name: local_name.to_string(),
                remote_key: remote_key.to_string(),
                value,
            },
        );
    }
}
