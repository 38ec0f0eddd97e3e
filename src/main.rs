//! # ragdock CLI
//!
//! Command-line interface for the ragdock retrieval pipeline.
//!
//! ## Usage
//!
//! ```bash
//! ragdock --config ./config/ragdock.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragdock ingest --url <URL>` | Fetch, chunk, and embed a document |
//! | `ragdock ingest --dir <DIR>` | Ingest every PDF under a directory |
//! | `ragdock ingest --text "Titel=..."` | Ingest inline text |
//! | `ragdock ask "<question>"` | Answer a question from the corpus |
//! | `ragdock status` | Show backend, counts, and key presence |
//!
//! Secrets come from the environment: `OPENAI_API_KEY` for the model
//! calls, `KV_REST_API_URL` + `KV_REST_API_TOKEN` to select the remote
//! key-value index backend instead of the local file.

mod chat;
mod chunk;
mod config;
mod embedding;
mod error;
mod ingest;
mod models;
mod prompt;
mod query;
mod retrieve;
mod store;
mod store_file;
mod store_kv;

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

use ingest::Source;

/// ragdock — retrieval-augmented answering over ingested documents.
#[derive(Parser)]
#[command(
    name = "ragdock",
    about = "Retrieval-augmented answering over ingested documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). All settings have defaults, so
    /// a missing file is fine.
    #[arg(long, global = true, default_value = "./config/ragdock.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest documents into the index.
    ///
    /// Accepts URLs (PDF or plain text), local files, a directory to scan
    /// for PDFs, and inline `TITLE=TEXT` snippets. All sources of one run
    /// are committed with a single index write: either everything lands,
    /// or nothing does.
    Ingest {
        /// Document URL to fetch; `.pdf` URLs go through text extraction.
        #[arg(long = "url")]
        urls: Vec<String>,

        /// Local file to ingest (PDF by extension, otherwise UTF-8 text).
        #[arg(long = "file")]
        files: Vec<PathBuf>,

        /// Directory to scan recursively for `*.pdf` files.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Inline text as `TITLE=TEXT`.
        #[arg(long = "text", value_parser = parse_titled_text)]
        texts: Vec<(String, String)>,
    },

    /// Ask a question against the ingested corpus.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Show index backend, document/chunk counts, and key presence.
    Status,
}

/// Parse a `TITLE=TEXT` pair for `--text` arguments.
fn parse_titled_text(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid TITLE=TEXT: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    let store = store::open_store(&cfg);

    match cli.command {
        Commands::Ingest {
            urls,
            files,
            dir,
            texts,
        } => {
            let mut sources: Vec<Source> = Vec::new();
            sources.extend(urls.into_iter().map(Source::Url));
            sources.extend(files.into_iter().map(Source::File));
            if let Some(dir) = dir {
                sources.extend(ingest::scan_pdf_dir(&dir)?);
            }
            sources.extend(texts.into_iter().map(|(title, text)| Source::Inline {
                title: Some(title),
                text,
            }));

            let report = ingest::run_ingest(&cfg, store.as_ref(), &sources).await?;
            println!("ingest");
            println!("  documents: {}", report.documents);
            println!("  chunks added: {}", report.added_chunks);
            println!("  chunks total: {}", report.total_chunks);
            println!("ok");
        }
        Commands::Ask { question } => {
            let answer = query::run_query(&cfg, store.as_ref(), &question).await?;
            println!("{}", answer);
        }
        Commands::Status => {
            let chunks = store.load().await?;
            let documents: BTreeSet<&str> = chunks.iter().map(|c| c.doc_id.as_str()).collect();
            println!("status");
            println!("  backend: {}", store.backend_name());
            println!("  documents: {}", documents.len());
            println!("  chunks: {}", chunks.len());
            println!(
                "  openai key: {}",
                if cfg.openai_api_key.is_some() {
                    "present"
                } else {
                    "missing"
                }
            );
        }
    }

    Ok(())
}
