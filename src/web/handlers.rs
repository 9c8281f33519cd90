//! Request handlers for the upload form.

use crate::extract::extract_and_store;
use crate::web::template;
use crate::web::upload;
use crate::web::AppState;
use axum::extract::{Multipart, State};
use axum::response::Html;
use std::sync::Arc;
use tracing::{error, info};

/// `GET /` — the upload form.
pub async fn index(State(_state): State<Arc<AppState>>) -> Html<String> {
    template::render_index()
}

/// `POST /extract` — run the pipeline on the uploaded PDF.
///
/// The structuring-failure category gets its own message (matching the
/// historical form); every other failure renders a generic processing error.
/// Typed details go to the log, never to the page.
pub async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Html<String> {
    let upload = match upload::parse_multipart(multipart).await {
        Ok(upload) => upload,
        Err(message) => {
            info!(%message, "upload rejected");
            return template::render_error(&message);
        }
    };

    info!(
        filename = %upload.filename,
        bytes = upload.data.len(),
        "processing upload"
    );

    match extract_and_store(
        &upload.data,
        state.client.as_ref(),
        &state.store,
        &state.config,
    )
    .await
    {
        Ok(output) => {
            let record_json = serde_json::to_string_pretty(&output.record.fields)
                .unwrap_or_else(|_| "{}".to_string());
            template::render_success(&output.record.id.to_string(), &record_json)
        }
        Err(e) if e.is_structuring_failure() => {
            info!(error = %e, "extraction produced no structured data");
            template::render_error("Failed to extract structured data. Please try again.")
        }
        Err(e) => {
            error!(error = %e, "pipeline failure");
            template::render_error("Processing failed. Please try again.")
        }
    }
}
