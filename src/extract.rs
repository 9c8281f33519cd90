//! Pipeline entry points.
//!
//! One invocation is a strict linear progression —
//! `Extracting → Structuring → Parsing → Storing` — with no branching, no
//! concurrency and no retry transition: any stage error terminates the run
//! and the caller re-triggers the whole flow. Dependencies (model client,
//! record store) are passed in explicitly so tests can substitute fakes.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats, Record};
use crate::pipeline::llm::StructuringClient;
use crate::pipeline::store::RecordStore;
use crate::pipeline::{parse, text};
use std::time::Instant;
use tracing::{debug, info};

/// Run stages 1–3: extract text, structure it, parse the JSON object.
///
/// Returns the parsed record without persisting it. Use
/// [`extract_and_store`] for the full flow.
///
/// # Errors
/// * [`ExtractError::DocumentParse`] — the bytes are not a readable PDF
/// * [`ExtractError::ModelRequest`] — the model endpoint call failed
/// * [`ExtractError::StructuringFormat`] — no parseable JSON object in the
///   response, or a configured required field is missing
pub async fn extract_record(
    bytes: &[u8],
    client: &dyn StructuringClient,
    config: &ExtractionConfig,
) -> Result<(Record, ExtractionStats), ExtractError> {
    let total_start = Instant::now();
    info!(bytes = bytes.len(), "starting extraction");

    // ── Stage 1: text extraction ─────────────────────────────────────────
    let extracted = text::extract_text(bytes)?;
    debug!(
        pages = extracted.pages,
        chars = extracted.text.len(),
        "document text extracted"
    );

    // ── Stage 2: structuring call ────────────────────────────────────────
    let llm_start = Instant::now();
    let response = client.structure(&extracted.text).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Stage 3: JSON extraction ─────────────────────────────────────────
    let record = parse::extract_json(&response.content, config.json_scan).ok_or_else(|| {
        ExtractError::StructuringFormat {
            detail: "model response contained no parseable JSON object".into(),
        }
    })?;

    check_required_fields(&record, config)?;

    let stats = ExtractionStats {
        pages: extracted.pages,
        text_chars: extracted.text.len(),
        prompt_tokens: response.prompt_tokens,
        completion_tokens: response.completion_tokens,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        fields = record.len(),
        llm_duration_ms, "extraction complete"
    );

    Ok((record, stats))
}

/// Run the full pipeline: extract, structure, parse, store.
///
/// On success the record has been durably inserted and the returned
/// [`ExtractionOutput`] carries its generated identifier. A storage failure
/// surfaces as [`ExtractError::StorageWrite`]; there is no silent drop of a
/// successfully parsed record.
pub async fn extract_and_store(
    bytes: &[u8],
    client: &dyn StructuringClient,
    store: &RecordStore,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let (record, mut stats) = extract_record(bytes, client, config).await?;

    // ── Stage 4: storage ─────────────────────────────────────────────────
    let stored = store.insert(record).await?;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(id = %stored.id, "record stored");

    Ok(ExtractionOutput {
        record: stored,
        stats,
    })
}

/// Opt-in post-parse validation: reject records missing mandatory fields.
fn check_required_fields(record: &Record, config: &ExtractionConfig) -> Result<(), ExtractError> {
    if config.required_fields.is_empty() {
        return Ok(());
    }

    let missing: Vec<&str> = config
        .required_fields
        .iter()
        .filter(|field| !record.contains_key(field.as_str()))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::StructuringFormat {
            detail: format!("record is missing required fields: {}", missing.join(", ")),
        })
    }
}
