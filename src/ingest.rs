//! Ingestion pipeline orchestration.
//!
//! Per source: fetch or read → extract text (PDFs routed through
//! `pdf-extract`) → chunk → embed in batches → accumulate. All new chunks
//! are appended to the previously loaded index and written back with a
//! single `save`, so a failing source leaves the index untouched — the
//! persisted state is always pre-ingest or fully updated, never partial.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

use crate::chunk::chunk_text;
use crate::config::Config;
use crate::embedding;
use crate::error::RagError;
use crate::models::{Chunk, IngestReport};
use crate::store::IndexStore;

/// A raw document source accepted by the ingest pipeline.
#[derive(Debug, Clone)]
pub enum Source {
    /// Fetchable locator; `.pdf` URLs go through text extraction.
    Url(String),
    /// Local file; PDF by extension, otherwise UTF-8 text.
    File(PathBuf),
    /// Inline text with an optional display title.
    Inline { title: Option<String>, text: String },
}

/// A source resolved to plain text plus its identity.
struct ExtractedDoc {
    doc_id: String,
    source: String,
    title: Option<String>,
    text: String,
}

/// Ingest the given sources into the index.
///
/// Loads the current index, processes sources one at a time in the order
/// given, and finishes with exactly one `save`. Fails as a whole if any
/// source cannot be extracted or embedded. A source yielding no text is
/// skipped; an ingest yielding no chunks at all is rejected.
pub async fn run_ingest(
    config: &Config,
    store: &dyn IndexStore,
    sources: &[Source],
) -> Result<IngestReport> {
    if sources.is_empty() {
        return Err(RagError::InvalidInput("no sources given".to_string()).into());
    }

    let index = store.load().await?;
    let mut new_chunks: Vec<Chunk> = Vec::new();
    let mut documents = 0usize;

    for source in sources {
        let doc = resolve_source(config, source).await?;
        let windows = chunk_text(
            &doc.text,
            config.chunking.window_chars,
            config.chunking.overlap_chars,
        )?;
        if windows.is_empty() {
            continue;
        }

        let mut vectors = Vec::with_capacity(windows.len());
        for batch in windows.chunks(config.embedding.batch_size) {
            vectors.extend(embedding::embed_texts(config, batch).await?);
        }

        new_chunks.extend(assemble_chunks(
            &doc.doc_id,
            &doc.source,
            doc.title.as_deref(),
            windows,
            vectors,
        ));
        documents += 1;
    }

    if new_chunks.is_empty() {
        return Err(
            RagError::InvalidInput("no text chunks found in the given sources".to_string()).into(),
        );
    }

    let added_chunks = new_chunks.len();
    let mut combined = index;
    combined.extend(new_chunks);
    let total_chunks = combined.len();
    store.save(&combined).await?;

    Ok(IngestReport {
        documents,
        added_chunks,
        total_chunks,
    })
}

/// Collect `*.pdf` files under `dir` as [`Source::File`] entries, sorted
/// by path for a deterministic ingest order.
pub fn scan_pdf_dir(dir: &Path) -> Result<Vec<Source>> {
    if !dir.is_dir() {
        return Err(RagError::InvalidInput(format!("not a directory: {}", dir.display())).into());
    }
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths.into_iter().map(Source::File).collect())
}

async fn resolve_source(config: &Config, source: &Source) -> Result<ExtractedDoc> {
    match source {
        Source::Url(url) => fetch_url(config, url).await,
        Source::File(path) => read_file(path),
        Source::Inline { title, text } => {
            let doc_id = format!("t:{}", title.as_deref().unwrap_or("text"));
            Ok(ExtractedDoc {
                doc_id,
                source: title.clone().unwrap_or_else(|| "tekst".to_string()),
                title: title.clone(),
                text: text.clone(),
            })
        }
    }
}

async fn fetch_url(config: &Config, url: &str) -> Result<ExtractedDoc> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.ingest.fetch_timeout_secs))
        .build()?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Fetching {} returned status {}", url, status);
    }

    let is_pdf = url.to_lowercase().ends_with(".pdf")
        || response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/pdf"))
            .unwrap_or(false);

    let text = if is_pdf {
        let bytes = response.bytes().await?;
        pdf_extract::extract_text_from_mem(&bytes)
            .with_context(|| format!("Failed to extract PDF text from {}", url))?
    } else {
        response.text().await?
    };

    let title = url
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(url)
        .to_string();

    Ok(ExtractedDoc {
        doc_id: format!("u:{}", url),
        source: url.to_string(),
        title: Some(title),
        text,
    })
}

fn read_file(path: &Path) -> Result<ExtractedDoc> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bestand")
        .to_string();

    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    let text = if is_pdf {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        pdf_extract::extract_text_from_mem(&bytes)
            .with_context(|| format!("Failed to extract PDF text from {}", path.display()))?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    Ok(ExtractedDoc {
        doc_id: format!("f:{}", name),
        source: name.clone(),
        title: Some(name),
        text,
    })
}

/// Pair each text window with its embedding and stamp identity:
/// `{doc_id}#{index}` with the positional chunk index in the document.
fn assemble_chunks(
    doc_id: &str,
    source: &str,
    title: Option<&str>,
    windows: Vec<String>,
    vectors: Vec<Vec<f32>>,
) -> Vec<Chunk> {
    windows
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (text, embedding))| Chunk {
            id: format!("{}#{}", doc_id, i),
            doc_id: doc_id.to_string(),
            source: source.to_string(),
            title: title.map(|t| t.to_string()),
            text,
            embedding: Some(embedding),
        })
        .collect()
}
