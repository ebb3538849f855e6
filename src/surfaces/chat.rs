//! Chat completions surface (`POST {base}/chat/completions`).
//!
//! OpenAI chat-completion style: a message list in, one assistant choice
//! out. The mock echoes the model name, returns the fixed chat placeholder,
//! and counts prompt tokens over `role: content` lines.

use super::{build_http_client, decode, post_json, Captured, MockDirective, TokenUsage};
use crate::config::HarnessConfig;
use crate::error::{ConformanceError, ConformanceResult};
use crate::expectations::{
    CHAT_CHOICE_KEYS, CHAT_ID_FORMAT, CHAT_MESSAGE_KEYS, CHAT_PLACEHOLDER, CHAT_TOP_KEYS,
    COMPLETION_USAGE_KEYS,
};
use crate::shape::{
    expect_exact_keys, expect_id, expect_literal, expect_recent_timestamp, expect_string,
    expect_u64, field,
};
use crate::surfaces::{ConformanceSurface, SurfaceProbe};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENDPOINT: &str = "/chat/completions";

/// A chat message in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

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

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(rename = "httpbun", skip_serializing_if = "Option::is_none")]
    pub mock: Option<MockDirective>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            n: None,
            mock: None,
        }
    }
}

/// Chat completion response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatCompletion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: TokenUsage,
}

/// One choice in a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: String,
}

/// The assistant message inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// Client for the chat completions surface.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    config: HarnessConfig,
}

impl ChatCompletionsClient {
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

    /// Send a chat completion request with default parameters.
    pub async fn create(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> ConformanceResult<Captured<ChatCompletion>> {
        self.create_request(&ChatCompletionRequest::new(model, messages.to_vec()))
            .await
    }

    /// Send a fully specified chat completion request.
    pub async fn create_request(
        &self,
        request: &ChatCompletionRequest,
    ) -> ConformanceResult<Captured<ChatCompletion>> {
        let url = self.config.endpoint_url(ENDPOINT);
        let raw = post_json(&self.http, &url, self.headers()?, request).await?;
        let parsed = decode("chat completions", &raw)?;
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

/// Verify a raw chat completion document against the documented shape.
///
/// Checks the key set at every nesting level, the id format, the stable
/// literals (`object`, `finish_reason`, message role), choice indexing, and
/// usage arithmetic. Content literals are left to the caller since the mock
/// directive can override them.
pub fn verify_shape(raw: &Value) -> ConformanceResult<()> {
    expect_exact_keys("/", raw, CHAT_TOP_KEYS)?;
    expect_literal("/", raw, "object", "chat.completion")?;

    let id = expect_string("/", raw, "id")?;
    expect_id("/id", id, &CHAT_ID_FORMAT)?;

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
        expect_exact_keys(&context, choice, CHAT_CHOICE_KEYS)?;
        expect_literal(&context, choice, "finish_reason", "stop")?;
        let index = expect_u64(&context, choice, "index")?;
        if index != i as u64 {
            return Err(ConformanceError::shape_mismatch(
                context,
                format!("choice index should be {i}, got {index}"),
            ));
        }

        let message = field(&context, choice, "message")?;
        let message_context = format!("{context}/message");
        expect_exact_keys(&message_context, message, CHAT_MESSAGE_KEYS)?;
        expect_literal(&message_context, message, "role", "assistant")?;
        expect_string(&message_context, message, "content")?;
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
impl ConformanceSurface for ChatCompletionsClient {
    fn name(&self) -> &'static str {
        "chat_completions"
    }

    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn canonical_model(&self) -> &'static str {
        "gpt-5-nano"
    }

    fn id_format(&self) -> &'static regex::Regex {
        &CHAT_ID_FORMAT
    }

    fn placeholder(&self) -> &'static str {
        CHAT_PLACEHOLDER
    }

    async fn probe(&self, model: &str, input: &str) -> ConformanceResult<SurfaceProbe> {
        let captured = self.create(model, &[ChatMessage::user(input)]).await?;
        let first = captured.parsed.choices.first().ok_or_else(|| {
            ConformanceError::shape_mismatch("/choices", "expected at least one choice")
        })?;
        Ok(SurfaceProbe {
            id: captured.parsed.id.clone(),
            model: captured.parsed.model.clone(),
            text: first.message.content.clone(),
            input_tokens: captured.parsed.usage.prompt_tokens,
            output_tokens: captured.parsed.usage.completion_tokens,
            raw: captured.raw,
        })
    }

    fn verify_shape(&self, raw: &Value) -> ConformanceResult<()> {
        verify_shape(raw)
    }
}
