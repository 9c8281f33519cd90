//! Web binary for pdf2claim: the upload form server.
//!
//! Both clients are constructed here, at startup, from the environment —
//! a missing `GROQ_API_KEY` or `PDF2CLAIM_DB_URI` fails the process before
//! it ever binds a socket.

use anyhow::{Context, Result};
use pdf2claim::web::{router, AppState};
use pdf2claim::{ExtractionConfig, GroqClient, RecordStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ExtractionConfig::from_env().context("Invalid configuration")?;
    let client = GroqClient::from_env(&config).context("Model client setup failed")?;
    let store = RecordStore::from_env(&config)
        .await
        .context("Record store setup failed")?;

    let state = Arc::new(AppState {
        client: Arc::new(client),
        store,
        config,
    });

    let addr: SocketAddr = std::env::var("PDF2CLAIM_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5001".to_string())
        .parse()
        .context("Invalid PDF2CLAIM_LISTEN_ADDR")?;

    let app = router(state);

    println!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
