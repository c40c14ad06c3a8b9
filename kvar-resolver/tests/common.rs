#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, Once,
    },
    time::Duration,
};

use async_trait::async_trait;
use kvar_core::{client::KeyValueClient, errors::Error, types};

static LOG_INIT_ONCE: Once = Once::new();

pub fn init_basic_logging() {
    LOG_INIT_ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
            .try_init();
    });
}

/// Test double with per-key values, failures and delays.
#[derive(Default)]
pub struct ScriptedClient {
    values: Mutex<HashMap<String, types::Value>>,
    failures: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    reads: Mutex<Vec<String>>,
    writes: Mutex<Vec<(String, types::Value)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    forbid_io: AtomicBool,
}

impl ScriptedClient {
    pub fn new() -> Self {
        init_basic_logging();
        Self::default()
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.as_bytes().to_vec());
        self
    }

    pub fn with_failure(mut self, key: &str, message: &str) -> Self {
        self.failures.insert(key.to_string(), message.to_string());
        self
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    /// Any read or write after this call panics.
    pub fn forbid_io(&self, forbid: bool) {
        self.forbid_io.store(forbid, Ordering::SeqCst);
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn read_count(&self, key: &str) -> usize {
        self.reads().iter().filter(|k| k.as_str() == key).count()
    }

    pub fn writes(&self) -> Vec<(String, types::Value)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn stored(&self, key: &str) -> Option<types::Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn pause(&self, key: &str) {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueClient for ScriptedClient {
    async fn read(&self, key: &str) -> types::Result<Option<types::Value>> {
        if self.forbid_io.load(Ordering::SeqCst) {
            panic!("unexpected remote read for key '{}'", key);
        }

        self.reads.lock().unwrap().push(key.to_string());
        self.pause(key).await;

        if let Some(message) = self.failures.get(key) {
            return Err(Error::remote_store(key, message.clone(), "scripted failure"));
        }

        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> types::Result<()> {
        if self.forbid_io.load(Ordering::SeqCst) {
            panic!("unexpected remote write for key '{}'", key);
        }

        self.pause(key).await;

        if let Some(message) = self.failures.get(key) {
            return Err(Error::remote_store(key, message.clone(), "scripted failure"));
        }

        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_vec()));
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());

        Ok(())
    }
}
