//! Index storage abstraction.
//!
//! The [`IndexStore`] trait is a two-operation contract over one logical
//! key: load the full chunk set, or atomically replace it. Two backends
//! implement it — a remote key-value service ([`store_kv::KvStore`]) and a
//! local JSON file ([`store_file::FileStore`]) — selected once at startup
//! by configuration presence, never switched mid-session.
//!
//! Concurrent writers to the same backend can race; the last `save` wins.
//! The core deliberately carries no locking or optimistic concurrency.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::models::Chunk;
use crate::store_file::FileStore;
use crate::store_kv::KvStore;

/// Durable mapping from one logical key to the full chunk sequence.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Return the current full chunk set. An index that does not exist
    /// yet is an empty sequence, never an error.
    async fn load(&self) -> Result<Vec<Chunk>>;

    /// Replace the entire persisted index with `chunks` (not a merge).
    async fn save(&self, chunks: &[Chunk]) -> Result<()>;

    /// Human-readable backend name, for status reporting.
    fn backend_name(&self) -> &'static str;
}

/// Select the backend once from configuration: the remote key-value store
/// when its connection settings are present, the local file otherwise.
pub fn open_store(config: &Config) -> Box<dyn IndexStore> {
    if config.has_kv_backend() {
        // has_kv_backend guarantees both values are present
        let url = config.kv_rest_api_url.clone().unwrap_or_default();
        let token = config.kv_rest_api_token.clone().unwrap_or_default();
        Box::new(KvStore::new(url, token))
    } else {
        Box::new(FileStore::new(config.store.path.clone()))
    }
}
