use async_trait::async_trait;

use crate::types;

pub mod memory;

pub use memory::MemoryClient;

/// Minimal capability a remote key-value store has to offer.
///
/// An unset key is a successful read carrying `None`. Every transport or
/// remote-side failure is reported as an error and is never retried here.
#[async_trait]
pub trait KeyValueClient: Send + Sync {
    async fn read(&self, key: &str) -> types::Result<Option<types::Value>>;

    async fn write(&self, key: &str, value: &[u8]) -> types::Result<()>;
}
