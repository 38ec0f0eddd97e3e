//! Query pipeline orchestration.
//!
//! Question → embed → top-K retrieval → grounding prompt → chat
//! completion → answer. The index is read-only on this path and loaded
//! fresh at the start of every call. An empty index short-circuits to a
//! fixed answer before any remote call is made — required behavior, not
//! an optimization, since there is nothing to retrieve and the downstream
//! call would be wasted and possibly billed.

use anyhow::Result;

use crate::chat;
use crate::config::Config;
use crate::embedding;
use crate::error::RagError;
use crate::prompt::{build_prompt, EMPTY_ANSWER_FALLBACK, NO_DOCUMENTS_ANSWER, SYSTEM_INSTRUCTION};
use crate::retrieve::top_k;
use crate::store::IndexStore;

/// Answer a question against the ingested corpus.
pub async fn run_query(config: &Config, store: &dyn IndexStore, question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(RagError::InvalidInput("question must not be empty".to_string()).into());
    }

    let index = store.load().await?;
    if index.is_empty() {
        return Ok(NO_DOCUMENTS_ANSWER.to_string());
    }

    let query_vec = embedding::embed_query(config, question).await?;
    let contexts = top_k(&query_vec, &index, config.retrieval.top_k);
    let prompt = build_prompt(question, &contexts);

    let answer = chat::complete(config, SYSTEM_INSTRUCTION, &prompt).await?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(EMPTY_ANSWER_FALLBACK.to_string());
    }
    Ok(answer.to_string())
}
