//! # pdf2claim
//!
//! Extract structured insurance and payment records from PDF documents with
//! a single LLM call, and persist them to a document store.
//!
//! ## Why this crate?
//!
//! Claim statements, remittance advices and payment notices arrive as PDFs
//! with no machine-readable structure. Instead of brittle per-layout parsing
//! rules, this crate extracts the embedded text and asks a language model to
//! emit one JSON object with the interesting fields (patient name, payment
//! amount, claim number, …), then stores whatever came back as a new document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Text    extract every page's text, joined by single spaces (lopdf)
//!  ├─ 2. LLM     one chat-completion request with a fixed instruction prompt
//!  ├─ 3. Parse   locate the JSON object in the response, strict parse
//!  └─ 4. Store   insert the record, get back a generated identifier
//! ```
//!
//! The flow is strictly linear — one document per invocation, no retries, no
//! fan-out. Failures carry a category ([`ExtractError`]) so callers can
//! distinguish a bad document from a bad model response from an unreachable
//! store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2claim::{extract_and_store, ExtractionConfig, GroqClient, RecordStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     // GROQ_API_KEY and PDF2CLAIM_DB_URI are read here, at startup.
//!     let client = GroqClient::from_env(&config)?;
//!     let store = RecordStore::from_env(&config).await?;
//!
//!     let bytes = std::fs::read("statement.pdf")?;
//!     let output = extract_and_store(&bytes, &client, &store, &config).await?;
//!     println!("stored as {}", output.record.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2claim` binary (clap + anyhow) |
//! | `web`   | on      | Enables the `pdf2claim-web` binary and [`web`] module (axum) |
//!
//! Disable both when using only the library:
//! ```toml
//! pdf2claim = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;
#[cfg(feature = "web")]
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, JsonScan};
pub use error::ExtractError;
pub use extract::{extract_and_store, extract_record};
pub use output::{ExtractionOutput, ExtractionStats, Record, StoredRecord};
pub use pipeline::llm::{GroqClient, ModelResponse, StructuringClient};
pub use pipeline::store::RecordStore;
pub use pipeline::text::ExtractedText;
