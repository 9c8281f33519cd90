//! Structuring client: one chat-completion request per document.
//!
//! The extracted text is interpolated into the fixed instruction template
//! and sent as a single user-role message to an OpenAI-compatible
//! `/chat/completions` endpoint. No streaming, no retries: a failure
//! terminates the invocation and the user re-triggers the whole flow.
//!
//! Whether the returned text actually contains JSON is *not* checked here —
//! format detection is deferred to [`crate::pipeline::parse`].

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::prompts;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::debug;

/// Raw response from the structuring endpoint.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// The completion message's text content, unparsed.
    pub content: String,
    /// Prompt tokens reported by the endpoint (0 if unreported).
    pub prompt_tokens: u64,
    /// Completion tokens reported by the endpoint (0 if unreported).
    pub completion_tokens: u64,
}

/// The model-call seam of the pipeline.
///
/// The pipeline takes this as an explicit dependency rather than holding a
/// process-wide client, so tests substitute a scripted fake and callers can
/// wrap the real client in middleware of their choosing.
#[async_trait]
pub trait StructuringClient: Send + Sync {
    /// Send the extracted document text to the model and return the raw
    /// response text.
    async fn structure(&self, text: &str) -> Result<ModelResponse, ExtractError>;
}

/// Client for Groq's OpenAI-compatible chat-completions API.
///
/// Works against any endpoint speaking the same wire format (OpenAI, vLLM,
/// Ollama, …) via [`ExtractionConfig::base_url`].
#[derive(Debug)]
pub struct GroqClient {
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    prompt_template: Option<String>,
    client: reqwest::Client,
}

impl GroqClient {
    /// Construct a client with an explicit API key.
    pub fn new(
        api_key: impl Into<String>,
        config: &ExtractionConfig,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ExtractError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            prompt_template: config.prompt_template.clone(),
            client,
        })
    }

    /// Construct a client with the API key from `GROQ_API_KEY`.
    ///
    /// Absence of the variable fails here, at construction time — never
    /// mid-pipeline.
    pub fn from_env(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ExtractError::MissingEnv {
                name: "GROQ_API_KEY",
                hint: "Set GROQ_API_KEY to a key from https://console.groq.com/keys.",
            })?;
        Self::new(api_key, config)
    }

    /// The model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, text: &str) -> Value {
        let prompt = match &self.prompt_template {
            Some(template) => prompts::render_prompt(template, text),
            None => prompts::build_prompt(text),
        };

        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if let Some(t) = self.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(n) = self.max_tokens {
            body["max_tokens"] = json!(n);
        }
        body
    }

    fn request_error(&self, detail: impl Into<String>) -> ExtractError {
        ExtractError::ModelRequest {
            endpoint: self.base_url.clone(),
            detail: detail.into(),
        }
    }
}

#[async_trait]
impl StructuringClient for GroqClient {
    async fn structure(&self, text: &str) -> Result<ModelResponse, ExtractError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(text);
        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.request_error("request timed out")
                } else {
                    self.request_error(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(self.request_error(format!("authentication failed (HTTP {status})")));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(self.request_error("rate limit exceeded (HTTP 429)"));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.request_error(format!("HTTP {status}: {text}")));
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| self.request_error(format!("invalid response body: {e}")))?;

        let content = payload["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| self.request_error("response missing message content"))?
            .to_string();

        let prompt_tokens = payload["usage"]["prompt_tokens"].as_u64().unwrap_or(0);
        let completion_tokens = payload["usage"]["completion_tokens"].as_u64().unwrap_or(0);

        debug!(
            model = %self.model,
            prompt_tokens,
            completion_tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "structuring call complete"
        );

        Ok(ModelResponse {
            content,
            prompt_tokens,
            completion_tokens,
        })
    }
}
