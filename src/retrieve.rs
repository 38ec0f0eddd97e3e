//! Cosine-similarity retriever.
//!
//! Ranks the full chunk set against a query vector by brute-force cosine
//! similarity — O(n·d) for n chunks of dimensionality d plus a stable
//! O(n log n) sort. No approximate-nearest-neighbor structure; corpora
//! are assumed small enough for a full scan.

use crate::models::Chunk;

/// Added to the denominator so an all-zero vector scores ~0 instead of
/// dividing by zero.
const EPSILON: f32 = 1e-8;

/// Cosine similarity between two vectors, range roughly [-1, 1].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt() + EPSILON)
}

/// Return up to `k` chunks most similar to `query`, best first.
///
/// The sort is stable and ties keep the original index order, so the
/// ranking is deterministic. A chunk with a missing embedding is scored
/// against the empty vector (similarity ~0, ranked last) rather than
/// failing — ingestion guarantees embeddings, but a malformed record must
/// not crash the query path.
pub fn top_k<'a>(query: &[f32], chunks: &'a [Chunk], k: usize) -> Vec<&'a Chunk> {
    let mut scored: Vec<(&Chunk, f32)> = chunks
        .iter()
        .map(|c| {
            let embedding = c.embedding.as_deref().unwrap_or(&[]);
            (c, cosine_similarity(query, embedding))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(k).map(|(c, _)| c).collect()
}
