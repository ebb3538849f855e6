//! Responses surface (`POST {base}/responses`).
//!
//! Structured output-item style: input is a bare string or a list of typed
//! message items; output is a list of output items carrying `output_text`
//! content blocks. Usage adds nested token-detail blocks, and the input
//! token estimate is padded by one relative to the other surfaces.

use super::{build_http_client, decode, post_json, Captured, MockDirective};
use crate::config::HarnessConfig;
use crate::error::{ConformanceError, ConformanceResult};
use crate::expectations::{
    MESSAGE_ID_FORMAT, RESPONSES_CONTENT_KEYS, RESPONSES_INPUT_DETAILS_KEYS,
    RESPONSES_OUTPUT_DETAILS_KEYS, RESPONSES_OUTPUT_KEYS, RESPONSES_PLACEHOLDER,
    RESPONSES_TOP_KEYS, RESPONSES_USAGE_KEYS, RESPONSE_ID_FORMAT,
};
use crate::shape::{
    expect_array_len, expect_exact_keys, expect_id, expect_literal, expect_null,
    expect_recent_timestamp, expect_string, expect_u64, field,
};
use crate::surfaces::{ConformanceSurface, SurfaceProbe};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENDPOINT: &str = "/responses";

/// Input to a responses request: a bare string or structured message items.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseInput {
    Text(String),
    Items(Vec<InputItem>),
}

impl From<&str> for ResponseInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<InputItem>> for ResponseInput {
    fn from(items: Vec<InputItem>) -> Self {
        Self::Items(items)
    }
}

/// A structured input item (`type: "message"`).
#[derive(Debug, Clone, Serialize)]
pub struct InputItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub role: String,
    pub content: Vec<InputContent>,
}

impl InputItem {
    /// A message item with a single `input_text` content block.
    pub fn message(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            item_type: "message".to_string(),
            role: role.into(),
            content: vec![InputContent {
                content_type: "input_text".to_string(),
                text: text.into(),
            }],
        }
    }
}

/// An `input_text` content block.
#[derive(Debug, Clone, Serialize)]
pub struct InputContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Responses request body.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: ResponseInput,
    #[serde(rename = "httpbun", skip_serializing_if = "Option::is_none")]
    pub mock: Option<MockDirective>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, input: impl Into<ResponseInput>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            mock: None,
        }
    }
}

/// Responses-surface response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelResponse {
    pub id: String,
    pub object: String,
    pub created_at: f64,
    pub model: String,
    pub status: String,
    pub error: Option<Value>,
    pub output: Vec<OutputItem>,
    pub output_text: String,
    pub usage: ResponsesUsage,
    pub parallel_tool_calls: bool,
    pub tool_choice: String,
    pub tools: Vec<Value>,
}

/// One output item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub role: String,
    pub status: String,
    pub content: Vec<OutputContent>,
}

/// An `output_text` content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
    pub annotations: Vec<Value>,
    pub logprobs: Option<Value>,
}

/// Usage block with nested token details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsesUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub input_tokens_details: InputTokensDetails,
    pub output_tokens_details: OutputTokensDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputTokensDetails {
    pub cached_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputTokensDetails {
    pub reasoning_tokens: u64,
}

/// Client for the responses surface.
#[derive(Debug, Clone)]
pub struct ResponsesClient {
    http: reqwest::Client,
    config: HarnessConfig,
}

impl ResponsesClient {
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

    /// Send a responses request with default parameters.
    pub async fn create(
        &self,
        model: &str,
        input: impl Into<ResponseInput>,
    ) -> ConformanceResult<Captured<ModelResponse>> {
        self.create_request(&ResponsesRequest::new(model, input))
            .await
    }

    /// Send a fully specified responses request.
    pub async fn create_request(
        &self,
        request: &ResponsesRequest,
    ) -> ConformanceResult<Captured<ModelResponse>> {
        let url = self.config.endpoint_url(ENDPOINT);
        let raw = post_json(&self.http, &url, self.headers()?, request).await?;
        let parsed = decode("responses", &raw)?;
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

/// Verify a raw responses document against the documented shape.
pub fn verify_shape(raw: &Value) -> ConformanceResult<()> {
    expect_exact_keys("/", raw, RESPONSES_TOP_KEYS)?;
    expect_literal("/", raw, "object", "response")?;
    expect_literal("/", raw, "status", "completed")?;
    expect_literal("/", raw, "tool_choice", "auto")?;
    expect_null("/", raw, "error")?;

    let id = expect_string("/", raw, "id")?;
    expect_id("/id", id, &RESPONSE_ID_FORMAT)?;

    let created_at = field("/", raw, "created_at")?.as_f64().ok_or_else(|| {
        ConformanceError::shape_mismatch("/", "field `created_at` should be a number")
    })?;
    expect_recent_timestamp("/", "created_at", created_at as i64)?;

    let parallel = field("/", raw, "parallel_tool_calls")?;
    if parallel.as_bool() != Some(false) {
        return Err(ConformanceError::shape_mismatch(
            "/",
            format!("field `parallel_tool_calls` should be false, got {parallel}"),
        ));
    }
    expect_array_len("/", raw, "tools", 0)?;

    let output = expect_array_len("/", raw, "output", 1)?;
    let item = &output[0];
    expect_exact_keys("/output/0", item, RESPONSES_OUTPUT_KEYS)?;
    expect_literal("/output/0", item, "type", "message")?;
    expect_literal("/output/0", item, "role", "assistant")?;
    expect_literal("/output/0", item, "status", "completed")?;
    let item_id = expect_string("/output/0", item, "id")?;
    expect_id("/output/0/id", item_id, &MESSAGE_ID_FORMAT)?;

    let content = expect_array_len("/output/0", item, "content", 1)?;
    let block = &content[0];
    expect_exact_keys("/output/0/content/0", block, RESPONSES_CONTENT_KEYS)?;
    expect_literal("/output/0/content/0", block, "type", "output_text")?;
    expect_null("/output/0/content/0", block, "logprobs")?;
    expect_array_len("/output/0/content/0", block, "annotations", 0)?;

    // The top-level shortcut must carry the same text as the content block.
    let block_text = expect_string("/output/0/content/0", block, "text")?;
    let output_text = expect_string("/", raw, "output_text")?;
    if block_text != output_text {
        return Err(ConformanceError::shape_mismatch(
            "/output_text",
            format!("should equal content block text {block_text:?}, got {output_text:?}"),
        ));
    }

    let usage = field("/", raw, "usage")?;
    expect_exact_keys("/usage", usage, RESPONSES_USAGE_KEYS)?;
    let input_tokens = expect_u64("/usage", usage, "input_tokens")?;
    let output_tokens = expect_u64("/usage", usage, "output_tokens")?;
    let total_tokens = expect_u64("/usage", usage, "total_tokens")?;
    if input_tokens + output_tokens != total_tokens {
        return Err(ConformanceError::shape_mismatch(
            "/usage",
            format!(
                "total_tokens should be {}, got {total_tokens}",
                input_tokens + output_tokens
            ),
        ));
    }

    let input_details = field("/usage", usage, "input_tokens_details")?;
    expect_exact_keys("/usage/input_tokens_details", input_details, RESPONSES_INPUT_DETAILS_KEYS)?;
    let cached = expect_u64("/usage/input_tokens_details", input_details, "cached_tokens")?;
    if cached != 0 {
        return Err(ConformanceError::shape_mismatch(
            "/usage/input_tokens_details",
            format!("cached_tokens should be 0, got {cached}"),
        ));
    }

    let output_details = field("/usage", usage, "output_tokens_details")?;
    expect_exact_keys(
        "/usage/output_tokens_details",
        output_details,
        RESPONSES_OUTPUT_DETAILS_KEYS,
    )?;
    let reasoning = expect_u64("/usage/output_tokens_details", output_details, "reasoning_tokens")?;
    if reasoning != 0 {
        return Err(ConformanceError::shape_mismatch(
            "/usage/output_tokens_details",
            format!("reasoning_tokens should be 0, got {reasoning}"),
        ));
    }

    Ok(())
}

#[async_trait]
impl ConformanceSurface for ResponsesClient {
    fn name(&self) -> &'static str {
        "responses"
    }

    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn canonical_model(&self) -> &'static str {
        "gpt-5-nano"
    }

    fn id_format(&self) -> &'static regex::Regex {
        &RESPONSE_ID_FORMAT
    }

    fn placeholder(&self) -> &'static str {
        RESPONSES_PLACEHOLDER
    }

    async fn probe(&self, model: &str, input: &str) -> ConformanceResult<SurfaceProbe> {
        let captured = self.create(model, input).await?;
        Ok(SurfaceProbe {
            id: captured.parsed.id.clone(),
            model: captured.parsed.model.clone(),
            text: captured.parsed.output_text.clone(),
            input_tokens: captured.parsed.usage.input_tokens,
            output_tokens: captured.parsed.usage.output_tokens,
            raw: captured.raw,
        })
    }

    fn verify_shape(&self, raw: &Value) -> ConformanceResult<()> {
        verify_shape(raw)
    }
}
