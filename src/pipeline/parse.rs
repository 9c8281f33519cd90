//! JSON extraction: locate and strictly parse the object in the model response.
//!
//! Models asked to "return only the JSON object" still wrap it in prose often
//! enough that the response cannot be fed to a JSON parser directly. Two
//! locating strategies are provided:
//!
//! * [`JsonScan::Greedy`] — everything between the first `{` and the last `}`
//!   in the text, parsed once. This reproduces the historical behaviour,
//!   including its known fragility: when the response holds several
//!   JSON-like blocks, or prose containing stray braces, the merged span is
//!   invalid JSON and extraction fails even though a valid object exists.
//!
//! * [`JsonScan::Balanced`] — a string- and escape-aware brace-depth scan
//!   that returns the first complete top-level object which parses as JSON.
//!   This recovers the multi-block case above.
//!
//! Both return `None` on failure — never an error. The pipeline maps `None`
//! to [`crate::error::ExtractError::StructuringFormat`].

use crate::config::JsonScan;
use crate::output::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// First `{` to last `}`, dot-matches-newline. Intentionally greedy.
static RE_BRACE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Extract the first JSON object from free-form model output.
///
/// Returns `None` when no object can be located or the located span does not
/// parse as a JSON object (a top-level array or scalar also yields `None`).
pub fn extract_json(response: &str, scan: JsonScan) -> Option<Record> {
    match scan {
        JsonScan::Greedy => greedy_span(response).and_then(parse_object),
        JsonScan::Balanced => first_balanced_object(response),
    }
}

/// The greedy brace span, if the text contains at least one `{…}` pair.
fn greedy_span(response: &str) -> Option<&str> {
    RE_BRACE_SPAN.find(response).map(|m| m.as_str())
}

/// Strict parse of a candidate span into an object.
fn parse_object(span: &str) -> Option<Record> {
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Scan for the first balanced top-level `{…}` group that parses as JSON.
///
/// Brace depth is tracked outside string literals only; `\"` inside strings
/// is honoured. Candidates that balance but fail the strict parse are skipped
/// and the scan resumes at the next opening brace.
fn first_balanced_object(response: &str) -> Option<Record> {
    let bytes = response.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = response[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(bytes, start) {
            if let Some(map) = parse_object(&response[start..=end]) {
                return Some(map);
            }
        }
        search_from = start + 1;
    }

    None
}

/// Byte index of the `}` closing the group opened at `start`, if balanced.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_object_parses_under_both_strategies() {
        let response = r#"Here you go: {"patient_name": "Jane Doe", "claim_number": "C123"} done."#;
        for scan in [JsonScan::Greedy, JsonScan::Balanced] {
            let record = extract_json(response, scan).unwrap();
            assert_eq!(record["patient_name"], json!("Jane Doe"));
            assert_eq!(record["claim_number"], json!("C123"));
            assert_eq!(record.len(), 2);
        }
    }

    #[test]
    fn no_braces_yields_none_not_panic() {
        assert!(extract_json("I could not find any data.", JsonScan::Greedy).is_none());
        assert!(extract_json("I could not find any data.", JsonScan::Balanced).is_none());
        assert!(extract_json("", JsonScan::Greedy).is_none());
    }

    #[test]
    fn greedy_merges_two_objects_into_an_invalid_span() {
        // The documented limitation: the greedy span covers both objects plus
        // the prose between them, which is not valid JSON.
        let response = r#"Here is the data: {"a": 1} and also {"b": 2} extra"#;
        assert!(extract_json(response, JsonScan::Greedy).is_none());
    }

    #[test]
    fn balanced_recovers_the_first_of_two_objects() {
        let response = r#"Here is the data: {"a": 1} and also {"b": 2} extra"#;
        let record = extract_json(response, JsonScan::Balanced).unwrap();
        assert_eq!(record["a"], json!(1));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn greedy_fails_on_trailing_stray_brace() {
        // A `}` in later prose extends the greedy span past the valid object.
        let response = r#"{"a": 1} (note: use curly braces, e.g. })"#;
        assert!(extract_json(response, JsonScan::Greedy).is_none());
        assert_eq!(
            extract_json(response, JsonScan::Balanced).unwrap()["a"],
            json!(1)
        );
    }

    #[test]
    fn balanced_handles_braces_inside_strings() {
        let response = r#"{"note": "open { and close }", "nested": {"x": [1, 2]}}"#;
        let record = extract_json(response, JsonScan::Balanced).unwrap();
        assert_eq!(record["note"], json!("open { and close }"));
        assert_eq!(record["nested"]["x"], json!([1, 2]));
    }

    #[test]
    fn balanced_handles_escaped_quote_inside_string() {
        let response = r#"prefix {"quote": "she said \"hi\" {"} suffix"#;
        let record = extract_json(response, JsonScan::Balanced).unwrap();
        assert_eq!(record["quote"], json!(r#"she said "hi" {"#));
    }

    #[test]
    fn balanced_skips_unparseable_balanced_group() {
        // `{not json}` balances but fails the strict parse; the scan moves on.
        let response = r#"{not json} then {"ok": true}"#;
        let record = extract_json(response, JsonScan::Balanced).unwrap();
        assert_eq!(record["ok"], json!(true));
    }

    #[test]
    fn top_level_array_is_not_an_object() {
        // Greedy span over array-of-objects text starts at the first `{`,
        // ends at the last `}` and parses to nothing useful either way.
        let response = r#"[{"a": 1}, {"b": 2}]"#;
        assert!(extract_json(response, JsonScan::Greedy).is_none());
    }

    #[test]
    fn multiline_object_parses() {
        let response = "Sure:\n{\n  \"payment_amount\": 250.75,\n  \"payment_date\": \"2024-11-02\"\n}\n";
        let record = extract_json(response, JsonScan::Greedy).unwrap();
        assert_eq!(record["payment_amount"], json!(250.75));
    }

    #[test]
    fn empty_object_is_a_valid_record() {
        let record = extract_json("{}", JsonScan::Greedy).unwrap();
        assert!(record.is_empty());
    }
}
