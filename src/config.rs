//! Configuration types for record extraction.
//!
//! All pipeline behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config between the web server and the CLI, serialise
//! it for logging, and diff two runs to understand why their outputs differ.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default model endpoint. Any OpenAI-compatible `/chat/completions` server
/// works; Groq is the default because its hosted Llama models are fast and
/// cheap for single-shot structuring calls.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier sent with every structuring request.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuration for a PDF-to-record extraction.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2claim::{ExtractionConfig, JsonScan};
///
/// let config = ExtractionConfig::builder()
///     .model("llama-3.1-8b-instant")
///     .json_scan(JsonScan::Balanced)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Model identifier sent to the structuring endpoint. Default:
    /// [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the OpenAI-compatible model endpoint. Default:
    /// [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Sampling temperature. `None` (default) leaves the endpoint default in
    /// place — extraction prompts do not benefit from creativity, but the
    /// original behaviour sent no override and that is preserved here.
    pub temperature: Option<f32>,

    /// Maximum completion tokens. `None` (default) uses the endpoint default.
    pub max_tokens: Option<u32>,

    /// HTTP client timeout for the model call in seconds. Default: 120.
    ///
    /// There is deliberately no retry on top of this: one upload, one model
    /// call. A timeout surfaces as [`ExtractError::ModelRequest`] and the
    /// user re-triggers the whole flow.
    pub api_timeout_secs: u64,

    /// How to locate the JSON object inside the model response.
    /// Default: [`JsonScan::Greedy`].
    pub json_scan: JsonScan,

    /// Field names that must be present in the parsed record.
    ///
    /// Empty (default) means no enforcement — the prompt only *suggests*
    /// field names, so records are accepted as-is. When non-empty, a record
    /// missing any listed field fails with
    /// [`ExtractError::StructuringFormat`] before anything is stored.
    pub required_fields: Vec<String>,

    /// Store namespace. Default: "patient_data".
    pub namespace: String,

    /// Store database name. Default: "main".
    pub database: String,

    /// Store table receiving the extracted records. Default: "insurance".
    pub table: String,

    /// Custom instruction template with a `{text}` placeholder. `None` uses
    /// the built-in default from [`crate::prompts`].
    pub prompt_template: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            max_tokens: None,
            api_timeout_secs: 120,
            json_scan: JsonScan::default(),
            required_fields: Vec::new(),
            namespace: "patient_data".to_string(),
            database: "main".to_string(),
            table: "insurance".to_string(),
            prompt_template: None,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognised variables: `PDF2CLAIM_MODEL`, `PDF2CLAIM_LLM_BASE_URL`,
    /// `PDF2CLAIM_JSON_SCAN` (`greedy` or `balanced`). The two secrets —
    /// `GROQ_API_KEY` and `PDF2CLAIM_DB_URI` — are read by the client and
    /// store constructors respectively, not here.
    pub fn from_env() -> Result<Self, ExtractError> {
        let mut builder = Self::builder();
        if let Ok(model) = std::env::var("PDF2CLAIM_MODEL") {
            if !model.is_empty() {
                builder = builder.model(model);
            }
        }
        if let Ok(url) = std::env::var("PDF2CLAIM_LLM_BASE_URL") {
            if !url.is_empty() {
                builder = builder.base_url(url);
            }
        }
        if let Ok(scan) = std::env::var("PDF2CLAIM_JSON_SCAN") {
            if !scan.is_empty() {
                builder = builder.json_scan(scan.parse().map_err(ExtractError::InvalidConfig)?);
            }
        }
        builder.build()
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn json_scan(mut self, scan: JsonScan) -> Self {
        self.config.json_scan = scan;
        self
    }

    pub fn required_fields(mut self, fields: Vec<String>) -> Self {
        self.config.required_fields = fields;
        self
    }

    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.config.namespace = ns.into();
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.config.database = db.into();
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.config.table = table.into();
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(ExtractError::InvalidConfig("model must not be empty".into()));
        }
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(ExtractError::InvalidConfig(format!(
                "base_url must be an HTTP(S) URL, got '{}'",
                c.base_url
            )));
        }
        if c.table.is_empty() {
            return Err(ExtractError::InvalidConfig("table must not be empty".into()));
        }
        if let Some(ref template) = c.prompt_template {
            if !template.contains("{text}") {
                return Err(ExtractError::InvalidConfig(
                    "prompt template must contain a {text} placeholder".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Strategy for locating the JSON object in the model response.
///
/// Two strategies exist because the naive one is load-bearing history: the
/// original implementation matched from the first `{` to the last `}` in the
/// response, which merges multiple JSON-like blocks into one invalid span.
/// `Greedy` keeps that observable behaviour; `Balanced` is the fix — a
/// string-aware scanner that returns the first complete top-level object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonScan {
    /// First `{` to last `}`, then one strict parse attempt. (default)
    #[default]
    Greedy,
    /// First balanced top-level object that parses as JSON.
    Balanced,
}

impl FromStr for JsonScan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(JsonScan::Greedy),
            "balanced" => Ok(JsonScan::Balanced),
            other => Err(format!(
                "unknown JSON scan strategy '{other}' (expected 'greedy' or 'balanced')"
            )),
        }
    }
}
