//! Embedded HTML template and result rendering.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Render the upload form with no result section.
pub fn render_index() -> Html<String> {
    Html(INDEX_HTML.replace("{{ result }}", ""))
}

/// Render the form plus a success panel: the generated identifier and a
/// pretty-printed view of the stored record.
pub fn render_success(id: &str, record_json: &str) -> Html<String> {
    let panel = format!(
        r#"<section class="result success">
  <h2>Data stored with ID: {}</h2>
  <h3>Extracted Data</h3>
  <pre>{}</pre>
</section>"#,
        escape_html(id),
        escape_html(record_json),
    );
    Html(INDEX_HTML.replace("{{ result }}", &panel))
}

/// Render the form plus a generic failure panel.
///
/// No error code, no diagnostic detail — the typed error is logged server
/// side only.
pub fn render_error(message: &str) -> Html<String> {
    let panel = format!(
        r#"<section class="result error">
  <p>{}</p>
</section>"#,
        escape_html(message),
    );
    Html(INDEX_HTML.replace("{{ result }}", &panel))
}

/// Minimal HTML escaping for text interpolated into the template.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
