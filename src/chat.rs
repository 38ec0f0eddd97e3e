//! Chat completion adapter.
//!
//! Sends the fixed system instruction plus the assembled grounding prompt
//! to the OpenAI chat completions API and returns the generated text.
//! Same contract as the embedding adapter: whole-call failure, classified
//! errors, no internal retries.

use std::time::Duration;

use crate::config::Config;
use crate::error::{classify_upstream, RagError};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Run a chat completion with a system message and one user message.
///
/// Returns the generated content, which may be empty — the caller decides
/// on a fallback. Missing API key fails before any remote call.
pub async fn complete(config: &Config, system: &str, user: &str) -> Result<String, RagError> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| RagError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.chat.timeout_secs))
        .build()
        .map_err(|e| RagError::Transport(e.to_string()))?;

    let body = serde_json::json!({
        "model": config.chat.model,
        "temperature": config.chat.temperature,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
    });

    let response = client
        .post(CHAT_COMPLETIONS_URL)
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
    Ok(parse_completion_response(&json))
}

/// Pull `choices[0].message.content` out of a chat completion response.
/// Absent or null content becomes an empty string.
fn parse_completion_response(json: &serde_json::Value) -> String {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string()
}
