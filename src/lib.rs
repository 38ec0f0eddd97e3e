//! # ragdock
//!
//! A minimal retrieval-augmented answering pipeline over ingested
//! documents.
//!
//! ragdock turns a corpus of source documents (URLs, PDFs, inline text)
//! into a vector index, and at query time retrieves the most relevant
//! passages to ground a language-model answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌─────────────┐
//! │  Sources    │──▶│   Ingestor    │──▶│ Index Store │
//! │ URL/PDF/txt│   │ chunk + embed │   │  KV or file │
//! └────────────┘   └───────────────┘   └──────┬──────┘
//!                                             │ load (read-only)
//!                                             ▼
//!                  ┌───────────────────────────────────┐
//!                  │            QueryEngine             │
//!                  │ embed → top-K → prompt → chat call │
//!                  └───────────────────────────────────┘
//! ```
//!
//! Both pipelines load the index fresh from the durable backend at the
//! start of every call; nothing is cached in memory across operations.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration plus environment secrets |
//! | [`models`] | Core data types ([`models::Chunk`]) |
//! | [`chunk`] | Sliding-window text chunking |
//! | [`embedding`] | Remote embedding adapter |
//! | [`chat`] | Chat completion adapter |
//! | [`store`] | Index storage abstraction and backend selection |
//! | [`retrieve`] | Cosine-similarity top-K ranking |
//! | [`prompt`] | Grounding prompt assembly |
//! | [`ingest`] | Ingestion pipeline |
//! | [`query`] | Query pipeline |
//! | [`error`] | Classified pipeline errors |

pub mod chat;
pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod models;
pub mod prompt;
pub mod query;
pub mod retrieve;
pub mod store;
pub mod store_file;
pub mod store_kv;
