//! Core data model for the retrieval pipeline.
//!
//! A [`Chunk`] is the atomic retrievable unit: a bounded substring of a
//! source document plus its embedding vector. The serde field names match
//! the persisted JSON index format (`docId` camelCase, `title` omitted when
//! absent), so existing index files remain loadable.

use serde::{Deserialize, Serialize};

/// A bounded substring of a source document, the unit of retrieval.
///
/// Chunks are created only during ingestion, are immutable once written,
/// and are removed only by a full index replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique within the index; `{doc_id}#{index}` with the positional
    /// chunk index inside the parent document.
    pub id: String,
    /// Parent document identifier (one document yields many chunks).
    #[serde(rename = "docId")]
    pub doc_id: String,
    /// Origin locator: URL, file name, or user-supplied title.
    pub source: String,
    /// Optional display label; falls back to `source` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The chunk's literal substring of the original document.
    pub text: String,
    /// Embedding vector; fixed dimensionality across the whole index.
    /// Absent only transiently before embedding completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    /// Display label for prompt rendering: title when present, else source.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.source)
    }
}

/// Counts reported after a successful ingest run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Number of source documents that produced at least one chunk.
    pub documents: usize,
    /// Chunks added by this run.
    pub added_chunks: usize,
    /// Total chunks in the index after the final save.
    pub total_chunks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_doc_id() {
        let chunk = Chunk {
            id: "u:https://example.com/a.pdf#0".to_string(),
            doc_id: "u:https://example.com/a.pdf".to_string(),
            source: "https://example.com/a.pdf".to_string(),
            title: Some("a.pdf".to_string()),
            text: "hello".to_string(),
            embedding: Some(vec![0.1, 0.2]),
        };
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["docId"], "u:https://example.com/a.pdf");
        assert_eq!(json["title"], "a.pdf");
        assert!(json.get("doc_id").is_none());
    }

    #[test]
    fn omits_absent_title_and_embedding() {
        let chunk = Chunk {
            id: "t:tekst#0".to_string(),
            doc_id: "t:tekst".to_string(),
            source: "tekst".to_string(),
            title: None,
            text: "hello".to_string(),
            embedding: None,
        };
        let json = serde_json::to_value(&chunk).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("embedding").is_none());
    }

    #[test]
    fn deserializes_legacy_index_record() {
        let json =
            r#"{"id":"u:x#0","docId":"u:x","source":"x","text":"body","embedding":[1.0,0.0]}"#;
        let chunk: Chunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.doc_id, "u:x");
        assert_eq!(chunk.label(), "x");
        assert_eq!(chunk.embedding.as_deref(), Some(&[1.0, 0.0][..]));
    }
}
