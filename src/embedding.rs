//! Remote embedding adapter.
//!
//! Converts text windows into fixed-length vectors via the OpenAI
//! embeddings API (`POST /v1/embeddings`). The call either succeeds for
//! the whole batch or fails as a whole; there are no partial results and
//! no internal retries — latency and failure propagate directly to the
//! caller, which decides whether to retry.

use std::time::Duration;

use crate::config::Config;
use crate::error::{classify_upstream, RagError};

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Embed a batch of texts, returning one vector per input in input order.
///
/// Fails with [`RagError::NotConfigured`] before any remote call when the
/// API key is absent, and with [`RagError::InvalidInput`] for an empty
/// batch. Upstream rejections are classified (quota vs. generic).
pub async fn embed_texts(config: &Config, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
    if texts.is_empty() {
        return Err(RagError::InvalidInput(
            "embedding batch must not be empty".to_string(),
        ));
    }
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| RagError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.embedding.timeout_secs))
        .build()
        .map_err(|e| RagError::Transport(e.to_string()))?;

    let body = serde_json::json!({
        "model": config.embedding.model,
        "input": texts,
    });

    let response = client
        .post(EMBEDDINGS_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .send()
        .await
        .map_err(|e| RagError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        return Err(classify_upstream(status.as_u16(), &body_text));
    }

    let json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| RagError::Transport(e.to_string()))?;
    parse_embeddings_response(&json, texts.len())
}

/// Embed a single query text.
///
/// Convenience wrapper around [`embed_texts`] for the query path, which
/// embeds exactly one text.
pub async fn embed_query(config: &Config, text: &str) -> Result<Vec<f32>, RagError> {
    let vectors = embed_texts(config, &[text.to_string()]).await?;
    vectors.into_iter().next().ok_or_else(|| RagError::Upstream {
        status: 200,
        body: "empty embedding response".to_string(),
    })
}

/// Extract the `data[].embedding` arrays from an embeddings response,
/// preserving input order.
fn parse_embeddings_response(
    json: &serde_json::Value,
    expected: usize,
) -> Result<Vec<Vec<f32>>, RagError> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| RagError::Upstream {
            status: 200,
            body: "embeddings response missing data array".to_string(),
        })?;

    let mut vectors = Vec::with_capacity(data.len());
    for item in data {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| RagError::Upstream {
                status: 200,
                body: "embeddings response item missing embedding".to_string(),
            })?;
        let vector: Vec<f32> = embedding
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        vectors.push(vector);
    }

    if vectors.len() != expected {
        return Err(RagError::Upstream {
            status: 200,
            body: format!(
                "embeddings response had {} vectors for {} inputs",
                vectors.len(),
                expected
            ),
        });
    }
    Ok(vectors)
}
