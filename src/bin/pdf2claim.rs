//! CLI binary for pdf2claim.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, runs the pipeline on one local PDF, and prints the
//! extracted record as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2claim::{
    extract_and_store, extract_record, ExtractionConfig, GroqClient, JsonScan, RecordStore,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract a record and print it as JSON
  pdf2claim statement.pdf

  # Extract and persist, printing the generated record id
  pdf2claim statement.pdf --store --db-uri ws://localhost:8000

  # Use the balanced JSON scanner instead of the historical greedy span
  pdf2claim statement.pdf --json-scan balanced

  # Reject records that lack mandatory fields
  pdf2claim statement.pdf --required-fields patient_name,claim_number

ENVIRONMENT VARIABLES:
  GROQ_API_KEY            API key for the model endpoint (required)
  PDF2CLAIM_DB_URI        Store endpoint, e.g. ws://localhost:8000 (with --store)
  PDF2CLAIM_MODEL         Override the model identifier
  PDF2CLAIM_LLM_BASE_URL  Override the model endpoint base URL
  PDF2CLAIM_JSON_SCAN     greedy (default) or balanced

SETUP:
  1. Set API key:   export GROQ_API_KEY=gsk_...
  2. Extract:       pdf2claim statement.pdf
"#;

/// Extract a structured insurance/payment record from a PDF using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2claim",
    version,
    about = "Extract structured insurance/payment records from PDF documents using an LLM",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Model identifier, e.g. llama-3.3-70b-versatile.
    #[arg(long, env = "PDF2CLAIM_MODEL")]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible model endpoint.
    #[arg(long, env = "PDF2CLAIM_LLM_BASE_URL")]
    base_url: Option<String>,

    /// JSON locating strategy: greedy or balanced.
    #[arg(long, env = "PDF2CLAIM_JSON_SCAN", value_enum, default_value = "greedy")]
    json_scan: JsonScanArg,

    /// Persist the extracted record to the store.
    #[arg(long)]
    store: bool,

    /// Store endpoint URI (used with --store).
    #[arg(long, env = "PDF2CLAIM_DB_URI")]
    db_uri: Option<String>,

    /// Comma-separated field names the record must contain.
    #[arg(long, value_delimiter = ',')]
    required_fields: Vec<String>,

    /// Per-call model timeout in seconds.
    #[arg(long, env = "PDF2CLAIM_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2CLAIM_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum JsonScanArg {
    Greedy,
    Balanced,
}

impl From<JsonScanArg> for JsonScan {
    fn from(v: JsonScanArg) -> Self {
        match v {
            JsonScanArg::Greedy => JsonScan::Greedy,
            JsonScanArg::Balanced => JsonScan::Balanced,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let client = GroqClient::from_env(&config).context("Model client setup failed")?;

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read '{}'", cli.input.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.store {
        let store = match &cli.db_uri {
            Some(uri) => RecordStore::connect(uri, &config).await,
            None => RecordStore::from_env(&config).await,
        }
        .context("Record store setup failed")?;

        let output = extract_and_store(&bytes, &client, &store, &config)
            .await
            .context("Extraction failed")?;

        let json = serde_json::to_string_pretty(&output.record.fields)
            .context("Failed to serialise record")?;
        writeln!(out, "{json}")?;
        eprintln!("stored as {}", output.record.id);
        eprintln!(
            "{} pages, {} chars, {} tokens in / {} out, {}ms total",
            output.stats.pages,
            output.stats.text_chars,
            output.stats.prompt_tokens,
            output.stats.completion_tokens,
            output.stats.total_duration_ms,
        );
    } else {
        let (record, stats) = extract_record(&bytes, &client, &config)
            .await
            .context("Extraction failed")?;

        let json = serde_json::to_string_pretty(&record).context("Failed to serialise record")?;
        writeln!(out, "{json}")?;
        eprintln!(
            "{} pages, {} chars, {} tokens in / {} out, {}ms total",
            stats.pages,
            stats.text_chars,
            stats.prompt_tokens,
            stats.completion_tokens,
            stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .json_scan(cli.json_scan.clone().into())
        .required_fields(cli.required_fields.clone())
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }

    builder.build().context("Invalid configuration")
}
