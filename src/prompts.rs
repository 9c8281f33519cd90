//! Instruction templates for LLM-based record structuring.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the suggested field set or the
//!    output instructions requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the rendered prompt directly
//!    without issuing a real model request.
//!
//! Callers can override the template via
//! [`crate::config::ExtractionConfig::prompt_template`]; the constant here is
//! used only when no override is provided.

/// Default instruction template for structuring extracted PDF text.
///
/// Field names are *suggested* in natural language, not enforced — the model
/// is free to add, rename, or omit fields. Enforcement, when wanted, happens
/// after parsing via [`crate::config::ExtractionConfig::required_fields`].
///
/// The `{text}` placeholder is replaced with the extracted document text.
pub const DEFAULT_EXTRACTION_PROMPT: &str = r#"Extract key information from this PDF text about patient payments and insurance details.
Format the extracted information as a JSON object. Include fields like patient name,
patient ID, payment amount, payment date, insurance provider, claim number, etc.
Return only the JSON object.

Text: {text}"#;

/// Render a template by interpolating the extracted document text.
pub fn render_prompt(template: &str, text: &str) -> String {
    template.replace("{text}", text)
}

/// Render the default instruction prompt for the given document text.
pub fn build_prompt(text: &str) -> String {
    render_prompt(DEFAULT_EXTRACTION_PROMPT, text)
}
