//! Error types for the pdf2claim library.
//!
//! One variant per pipeline failure category, so callers can tell a bad
//! document from a bad model response from an unreachable store and pick
//! their own recovery policy. The original design let network and storage
//! faults escape as unhandled exceptions; here every stage returns an
//! explicit `Result` and the binaries decide what to show the user.

use thiserror::Error;

/// All errors returned by the pdf2claim library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The uploaded bytes could not be parsed as a PDF.
    #[error("failed to parse PDF document: {detail}")]
    DocumentParse { detail: String },

    // ── Model endpoint errors ─────────────────────────────────────────────
    /// The request to the model endpoint failed (network, auth, rate limit,
    /// or a malformed completion payload).
    #[error("model request to '{endpoint}' failed: {detail}")]
    ModelRequest { endpoint: String, detail: String },

    // ── Structuring errors ────────────────────────────────────────────────
    /// The model response contained no parseable JSON object.
    ///
    /// The only category the web form distinguishes: it maps to the
    /// "failed to extract structured data" message shown to the user.
    #[error("no structured data could be extracted: {detail}")]
    StructuringFormat { detail: String },

    // ── Storage errors ────────────────────────────────────────────────────
    /// The document store was unreachable or rejected the write.
    #[error("record store operation failed: {detail}")]
    StorageWrite { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required environment variable is absent.
    ///
    /// Raised at process startup when the respective client is constructed,
    /// never mid-pipeline.
    #[error("missing environment variable {name}\n{hint}")]
    MissingEnv {
        name: &'static str,
        hint: &'static str,
    },
}

impl ExtractError {
    /// True for the category the user-facing form reports as an extraction
    /// failure rather than a processing fault.
    pub fn is_structuring_failure(&self) -> bool {
        matches!(self, ExtractError::StructuringFormat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_parse_display() {
        let e = ExtractError::DocumentParse {
            detail: "invalid file header".into(),
        };
        assert!(e.to_string().contains("invalid file header"));
    }

    #[test]
    fn model_request_display_includes_endpoint() {
        let e = ExtractError::ModelRequest {
            endpoint: "https://api.groq.com/openai/v1".into(),
            detail: "HTTP 429".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("api.groq.com"), "got: {msg}");
        assert!(msg.contains("429"));
    }

    #[test]
    fn missing_env_display_includes_hint() {
        let e = ExtractError::MissingEnv {
            name: "GROQ_API_KEY",
            hint: "Set GROQ_API_KEY to your API key.",
        };
        let msg = e.to_string();
        assert!(msg.contains("GROQ_API_KEY"));
        assert!(msg.contains("Set GROQ_API_KEY"));
    }

    #[test]
    fn structuring_failure_predicate() {
        let format = ExtractError::StructuringFormat {
            detail: "no braces found".into(),
        };
        let storage = ExtractError::StorageWrite {
            detail: "connection refused".into(),
        };
        assert!(format.is_structuring_failure());
        assert!(!storage.is_structuring_failure());
    }
}
