//! Anthropic messages surface (`POST {base}/v1/messages`).
//!
//! Messages-API style: authentication goes through `x-api-key` plus an
//! `anthropic-version` header, `max_tokens` is part of the request contract,
//! and usage carries only input/output counts with no total.

use super::{build_http_client, decode, post_json, Captured, MockDirective};
use crate::config::HarnessConfig;
use crate::error::{ConformanceError, ConformanceResult};
use crate::expectations::{
    ANTHROPIC_CONTENT_KEYS, ANTHROPIC_PLACEHOLDER, ANTHROPIC_TOP_KEYS, ANTHROPIC_USAGE_KEYS,
    MESSAGE_ID_FORMAT,
};
use crate::shape::{
    expect_array_len, expect_exact_keys, expect_id, expect_literal, expect_null, expect_string,
    expect_u64, field,
};
use crate::surfaces::{ConformanceSurface, SurfaceProbe};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENDPOINT: &str = "/v1/messages";

/// Version header the real API requires; the mock ignores it, but sending it
/// keeps the client on the same wire path as a real SDK.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default `max_tokens` used by the original suites.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// A message in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageParam {
    pub role: String,
    pub content: String,
}

impl MessageParam {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Messages request body.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<MessageParam>,
    #[serde(rename = "httpbun", skip_serializing_if = "Option::is_none")]
    pub mock: Option<MockDirective>,
}

impl MessagesRequest {
    pub fn new(model: impl Into<String>, messages: Vec<MessageParam>) -> Self {
        Self {
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            mock: None,
        }
    }
}

/// Message response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: String,
    pub stop_sequence: Option<String>,
    pub usage: MessagesUsage,
}

/// A text content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
    pub citations: Option<Value>,
}

/// Usage block: input and output counts only, no total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Client for the Anthropic messages surface.
#[derive(Debug, Clone)]
pub struct MessagesClient {
    http: reqwest::Client,
    config: HarnessConfig,
}

impl MessagesClient {
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

    /// Send a messages request with the default `max_tokens`.
    pub async fn create(
        &self,
        model: &str,
        messages: &[MessageParam],
    ) -> ConformanceResult<Captured<Message>> {
        self.create_request(&MessagesRequest::new(model, messages.to_vec()))
            .await
    }

    /// Send a fully specified messages request.
    pub async fn create_request(
        &self,
        request: &MessagesRequest,
    ) -> ConformanceResult<Captured<Message>> {
        let url = self.config.endpoint_url(ENDPOINT);
        let raw = post_json(&self.http, &url, self.headers()?, request).await?;
        let parsed = decode("messages", &raw)?;
        Ok(Captured { parsed, raw })
    }

    fn headers(&self) -> ConformanceResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| {
                ConformanceError::configuration_error(format!("Invalid API key format: {e}"))
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }
}

/// Verify a raw message document against the documented shape.
pub fn verify_shape(raw: &Value) -> ConformanceResult<()> {
    expect_exact_keys("/", raw, ANTHROPIC_TOP_KEYS)?;
    expect_literal("/", raw, "type", "message")?;
    expect_literal("/", raw, "role", "assistant")?;
    expect_literal("/", raw, "stop_reason", "end_turn")?;
    expect_null("/", raw, "stop_sequence")?;

    let id = expect_string("/", raw, "id")?;
    expect_id("/id", id, &MESSAGE_ID_FORMAT)?;

    let content = expect_array_len("/", raw, "content", 1)?;
    let block = &content[0];
    expect_exact_keys("/content/0", block, ANTHROPIC_CONTENT_KEYS)?;
    expect_literal("/content/0", block, "type", "text")?;
    expect_null("/content/0", block, "citations")?;
    expect_string("/content/0", block, "text")?;

    let usage = field("/", raw, "usage")?;
    expect_exact_keys("/usage", usage, ANTHROPIC_USAGE_KEYS)?;
    expect_u64("/usage", usage, "input_tokens")?;
    expect_u64("/usage", usage, "output_tokens")?;

    Ok(())
}

#[async_trait]
impl ConformanceSurface for MessagesClient {
    fn name(&self) -> &'static str {
        "anthropic_messages"
    }

    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn canonical_model(&self) -> &'static str {
        "claude-3-5-sonnet-20241022"
    }

    fn id_format(&self) -> &'static regex::Regex {
        &MESSAGE_ID_FORMAT
    }

    fn placeholder(&self) -> &'static str {
        ANTHROPIC_PLACEHOLDER
    }

    async fn probe(&self, model: &str, input: &str) -> ConformanceResult<SurfaceProbe> {
        let captured = self.create(model, &[MessageParam::user(input)]).await?;
        let first = captured.parsed.content.first().ok_or_else(|| {
            ConformanceError::shape_mismatch("/content", "expected at least one content block")
        })?;
        Ok(SurfaceProbe {
            id: captured.parsed.id.clone(),
            model: captured.parsed.model.clone(),
            text: first.text.clone(),
            input_tokens: captured.parsed.usage.input_tokens,
            output_tokens: captured.parsed.usage.output_tokens,
            raw: captured.raw,
        })
    }

    fn verify_shape(&self, raw: &Value) -> ConformanceResult<()> {
        verify_shape(raw)
    }
}
