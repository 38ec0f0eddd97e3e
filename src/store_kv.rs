//! Remote key-value backend for the index store.
//!
//! Talks the Upstash/Vercel KV REST protocol: `GET {base}/get/{key}`
//! returns `{"result": <value|null>}`, `POST {base}/set/{key}` writes the
//! request body as the value. The whole serialized chunk sequence lives
//! under one logical key, so load and save stay single round-trips.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::models::Chunk;
use crate::store::IndexStore;

/// Logical key holding the serialized index. Bump the suffix when the
/// record format changes incompatibly.
pub const INDEX_KEY: &str = "rag:index:v1";

const KV_TIMEOUT_SECS: u64 = 30;

/// Index store backed by an Upstash-compatible KV REST endpoint.
pub struct KvStore {
    base_url: String,
    token: String,
}

impl KvStore {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(Duration::from_secs(KV_TIMEOUT_SECS))
            .build()?)
    }
}

#[async_trait]
impl IndexStore for KvStore {
    async fn load(&self) -> Result<Vec<Chunk>> {
        let response = self
            .client()?
            .get(format!("{}/get/{}", self.base_url, INDEX_KEY))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("KV load failed with status {}: {}", status, body);
        }

        let envelope: serde_json::Value = response.json().await?;
        parse_kv_result(&envelope)
    }

    async fn save(&self, chunks: &[Chunk]) -> Result<()> {
        let serialized = serde_json::to_string(chunks)?;
        let response = self
            .client()?
            .post(format!("{}/set/{}", self.base_url, INDEX_KEY))
            .bearer_auth(&self.token)
            .body(serialized)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("KV save failed with status {}: {}", status, body);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "kv"
    }
}

/// Unwrap the `{"result": ...}` envelope. A null result means the key was
/// never written: an empty index. The value is stored as a JSON string but
/// some clients write the array directly, so both shapes are accepted.
fn parse_kv_result(envelope: &serde_json::Value) -> Result<Vec<Chunk>> {
    match envelope.get("result") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::String(s)) => Ok(serde_json::from_str(s)?),
        Some(value) => Ok(serde_json::from_value(value.clone())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_result_is_an_empty_index() {
        let envelope = serde_json::json!({ "result": null });
        assert!(parse_kv_result(&envelope).unwrap().is_empty());
        assert!(parse_kv_result(&serde_json::json!({})).unwrap().is_empty());
    }

    #[test]
    fn string_encoded_result_is_parsed() {
        let chunks = r#"[{"id":"t:a#0","docId":"t:a","source":"a","text":"x","embedding":[1.0]}]"#;
        let envelope = serde_json::json!({ "result": chunks });
        let parsed = parse_kv_result(&envelope).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "t:a#0");
    }

    #[test]
    fn inline_array_result_is_parsed() {
        let envelope = serde_json::json!({
            "result": [{"id":"t:a#0","docId":"t:a","source":"a","text":"x"}]
        });
        let parsed = parse_kv_result(&envelope).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].embedding.is_none());
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let store = KvStore::new("https://kv.example/".to_string(), "t".to_string());
        assert_eq!(store.base_url, "https://kv.example");
    }
}
