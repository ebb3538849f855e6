//! Legacy completions surface (`POST {base}/completions`).
//!
//! Text-completion style: a bare prompt (or prompt batch) in, `n` identical
//! text choices out. Unlike the chat surface, prompt tokens are counted over
//! the prompt text alone, with no role prefix.

use super::{build_http_client, decode, post_json, Captured, TokenUsage};
use crate::config::HarnessConfig;
use crate::error::{ConformanceError, ConformanceResult};
use crate::expectations::{
    COMPLETION_CHOICE_KEYS, COMPLETION_ID_FORMAT, COMPLETION_PLACEHOLDER, COMPLETION_TOP_KEYS,
    COMPLETION_USAGE_KEYS,
};
use crate::shape::{
    expect_exact_keys, expect_id, expect_literal, expect_null, expect_recent_timestamp,
    expect_string, expect_u64, field,
};
use crate::surfaces::{ConformanceSurface, SurfaceProbe};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENDPOINT: &str = "/completions";

/// A completion prompt: a single string or a batch of strings.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Batch(Vec<String>),
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: Prompt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens: None,
            n: None,
        }
    }
}

/// Completion response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Completion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: TokenUsage,
}

/// One choice in a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    pub logprobs: Option<Value>,
    pub finish_reason: String,
}

/// Client for the legacy completions surface.
#[derive(Debug, Clone)]
pub struct CompletionsClient {
    http: reqwest::Client,
    config: HarnessConfig,
}

impl CompletionsClient {
    /// Create a client bound to the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConformanceError::ConfigurationError`] if the configuration
    /// is invalid or the HTTP client cannot be built.
    pub fn new(config: HarnessConfig) -> ConformanceResult<Self> {
        config.validate()?;
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Send a completion request with default parameters.
    pub async fn create(
        &self,
        model: &str,
        prompt: impl Into<Prompt>,
    ) -> ConformanceResult<Captured<Completion>> {
        self.create_request(&CompletionRequest::new(model, prompt))
            .await
    }

    /// Send a fully specified completion request.
    pub async fn create_request(
        &self,
        request: &CompletionRequest,
    ) -> ConformanceResult<Captured<Completion>> {
        let url = self.config.endpoint_url(ENDPOINT);
        let raw = post_json(&self.http, &url, self.headers()?, request).await?;
        let parsed = decode("completions", &raw)?;
        Ok(Captured { parsed, raw })
    }

    fn headers(&self) -> ConformanceResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|e| {
                ConformanceError::configuration_error(format!("Invalid API key format: {e}"))
            })?,
        );
        Ok(headers)
    }
}

/// Verify a raw completion document against the documented shape.
pub fn verify_shape(raw: &Value) -> ConformanceResult<()> {
    expect_exact_keys("/", raw, COMPLETION_TOP_KEYS)?;
    expect_literal("/", raw, "object", "text_completion")?;

    let id = expect_string("/", raw, "id")?;
    expect_id("/id", id, &COMPLETION_ID_FORMAT)?;

    let created = expect_u64("/", raw, "created")?;
    expect_recent_timestamp("/", "created", created as i64)?;

    let choices = field("/", raw, "choices")?
        .as_array()
        .ok_or_else(|| ConformanceError::shape_mismatch("/choices", "expected array"))?;
    if choices.is_empty() {
        return Err(ConformanceError::shape_mismatch(
            "/choices",
            "expected at least one choice",
        ));
    }

    for (i, choice) in choices.iter().enumerate() {
        let context = format!("/choices/{i}");
        expect_exact_keys(&context, choice, COMPLETION_CHOICE_KEYS)?;
        expect_literal(&context, choice, "finish_reason", "stop")?;
        expect_null(&context, choice, "logprobs")?;
        expect_string(&context, choice, "text")?;
        let index = expect_u64(&context, choice, "index")?;
        if index != i as u64 {
            return Err(ConformanceError::shape_mismatch(
                context,
                format!("choice index should be {i}, got {index}"),
            ));
        }
    }

    let usage = field("/", raw, "usage")?;
    expect_exact_keys("/usage", usage, COMPLETION_USAGE_KEYS)?;
    let prompt = expect_u64("/usage", usage, "prompt_tokens")?;
    let completion = expect_u64("/usage", usage, "completion_tokens")?;
    let total = expect_u64("/usage", usage, "total_tokens")?;
    if prompt + completion != total {
        return Err(ConformanceError::shape_mismatch(
            "/usage",
            format!("total_tokens should be {}, got {total}", prompt + completion),
        ));
    }

    Ok(())
}

#[async_trait]
impl ConformanceSurface for CompletionsClient {
    fn name(&self) -> &'static str {
        "completions"
    }

    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn canonical_model(&self) -> &'static str {
        "gpt-3.5-turbo-instruct"
    }

    fn id_format(&self) -> &'static regex::Regex {
        &COMPLETION_ID_FORMAT
    }

    fn placeholder(&self) -> &'static str {
        COMPLETION_PLACEHOLDER
    }

    async fn probe(&self, model: &str, input: &str) -> ConformanceResult<SurfaceProbe> {
        let captured = self.create(model, input).await?;
        let first = captured.parsed.choices.first().ok_or_else(|| {
            ConformanceError::shape_mismatch("/choices", "expected at least one choice")
        })?;
        Ok(SurfaceProbe {
            id: captured.parsed.id.clone(),
            model: captured.parsed.model.clone(),
            text: first.text.clone(),
            input_tokens: captured.parsed.usage.prompt_tokens,
            output_tokens: captured.parsed.usage.completion_tokens,
            raw: captured.raw,
        })
    }

    fn verify_shape(&self, raw: &Value) -> ConformanceResult<()> {
        verify_shape(raw)
    }
}
