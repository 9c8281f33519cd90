//! Output types: the extracted record, its stored form, and run statistics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::RecordId;

/// A loosely-typed extracted record: string keys, scalar or nested values.
///
/// No required fields, no type constraints — the shape is whatever the model
/// produced. Any enforcement is opt-in via
/// [`crate::config::ExtractionConfig::required_fields`].
pub type Record = Map<String, Value>;

/// A record as persisted in the store: the extracted fields plus the
/// generated identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Store-generated unique identifier, e.g. `insurance:f3k9…`.
    pub id: RecordId,
    /// The extracted fields, stored unmodified.
    #[serde(flatten)]
    pub fields: Record,
}

/// Statistics for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the source document.
    pub pages: usize,
    /// Characters of extracted text sent to the model.
    pub text_chars: usize,
    /// Prompt tokens reported by the model endpoint (0 if unreported).
    pub prompt_tokens: u64,
    /// Completion tokens reported by the model endpoint (0 if unreported).
    pub completion_tokens: u64,
    /// Wall-clock time of the model call.
    pub llm_duration_ms: u64,
    /// Wall-clock time of the whole pipeline.
    pub total_duration_ms: u64,
}

/// Result of a successful end-to-end extraction.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    /// The stored record, including its generated identifier.
    pub record: StoredRecord,
    /// Run statistics.
    pub stats: ExtractionStats,
}
