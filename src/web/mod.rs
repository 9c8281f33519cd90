//! Web form surface: upload one PDF, run the pipeline, show the result.
//!
//! A deliberately small axum app — two routes, one embedded template, no
//! sessions. All pipeline dependencies live in [`AppState`], constructed once
//! at startup; handlers borrow them per request.

mod handlers;
mod template;
mod upload;

use crate::config::ExtractionConfig;
use crate::pipeline::llm::StructuringClient;
use crate::pipeline::store::RecordStore;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Uploads above this size are rejected before the pipeline runs.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub client: Arc<dyn StructuringClient>,
    pub store: RecordStore,
    pub config: ExtractionConfig,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/extract", post(handlers::extract))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
