//! Local file backend for the index store.
//!
//! Persists the whole chunk sequence as one JSON document at a fixed
//! path, creating parent directories as needed. Saves go through a
//! temporary file plus rename so a crashed write never leaves a
//! half-written index behind.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::models::Chunk;
use crate::store::IndexStore;

/// Index store backed by a single JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl IndexStore for FileStore {
    async fn load(&self) -> Result<Vec<Chunk>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read index file: {}", self.path.display())
                })
            }
        };
        let chunks: Vec<Chunk> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse index file: {}", self.path.display()))?;
        Ok(chunks)
    }

    async fn save(&self, chunks: &[Chunk]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create index directory: {}", parent.display())
                })?;
            }
        }

        let serialized = serde_json::to_string(chunks)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized)
            .with_context(|| format!("Failed to write index file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace index file: {}", self.path.display()))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn chunk(id: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            doc_id: "t:doc".to_string(),
            source: "doc".to_string(),
            title: Some("Doc".to_string()),
            text: format!("tekst {}", id),
            embedding: Some(vec![0.5, -0.5]),
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_index() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested/rag-index.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_load_round_trip_is_lossless() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join(".data/rag-index.json"));

        let chunks = vec![chunk("t:doc#0"), chunk("t:doc#1")];
        store.save(&chunks).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "t:doc#0");
        assert_eq!(loaded[1].embedding, chunks[1].embedding);
    }

    #[tokio::test]
    async fn save_of_load_leaves_index_unchanged() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("rag-index.json"));
        store.save(&[chunk("a#0")]).await.unwrap();

        let before = std::fs::read_to_string(tmp.path().join("rag-index.json")).unwrap();
        let loaded = store.load().await.unwrap();
        store.save(&loaded).await.unwrap();
        let after = std::fs::read_to_string(tmp.path().join("rag-index.json")).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn save_replaces_rather_than_merges() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("rag-index.json"));
        store.save(&[chunk("a#0"), chunk("a#1")]).await.unwrap();
        store.save(&[chunk("b#0")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b#0");
    }
}
