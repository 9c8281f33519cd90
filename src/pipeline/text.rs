//! Text extraction: read a PDF byte stream and emit one concatenated blob.
//!
//! Page texts are joined with a single space and no page-boundary markers —
//! downstream the model sees one flat document. A page with no extractable
//! text (scanned/image-only content) contributes an empty segment rather than
//! an error; there is no OCR fallback, so such pages silently degrade output
//! quality. Only an unreadable document is fatal.

use crate::error::ExtractError;
use lopdf::Document;
use tracing::debug;

/// Text extracted from a PDF document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// All page texts joined with a single space, in page order.
    pub text: String,
    /// Number of pages in the document.
    pub pages: usize,
}

/// Check the PDF magic bytes without parsing the document.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

/// Extract text from every page of a PDF byte stream.
///
/// # Errors
/// Returns [`ExtractError::DocumentParse`] if the bytes are not a readable
/// PDF or the document is encrypted. Per-page extraction failures are *not*
/// errors — the page contributes an empty segment.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::DocumentParse {
        detail: e.to_string(),
    })?;

    if doc.is_encrypted() {
        return Err(ExtractError::DocumentParse {
            detail: "document is encrypted".into(),
        });
    }

    let mut segments = Vec::new();
    for (page_num, _object_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => segments.push(text),
            Err(e) => {
                debug!(page = page_num, error = %e, "page yielded no extractable text");
                segments.push(String::new());
            }
        }
    }

    let pages = segments.len();
    let text = segments.join(" ");
    debug!(pages, chars = text.len(), "text extraction complete");

    Ok(ExtractedText { text, pages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_detection() {
        assert!(is_pdf(b"%PDF-1.5 rest of file"));
        assert!(!is_pdf(b"PK\x03\x04 zip archive"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err = extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::DocumentParse { .. }));
    }

    #[test]
    fn truncated_header_is_a_parse_error() {
        let err = extract_text(b"%PDF-1.5").unwrap_err();
        assert!(matches!(err, ExtractError::DocumentParse { .. }));
    }
}
