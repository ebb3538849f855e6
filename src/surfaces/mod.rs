//! Surface clients for the mock LLM endpoints.
//!
//! One submodule per API surface, each with its request/response wire types
//! and a thin client. The clients deliberately carry none of the machinery a
//! production SDK would (no retries, no streaming, no rate limiting); their
//! job is to put exactly one request on the wire and hand back exactly what
//! came off it.

use crate::config::HarnessConfig;
use crate::error::{ConformanceError, ConformanceResult};
use crate::logging::{log_debug, log_error};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod anthropic;
pub mod chat;
pub mod completions;
pub mod responses;

pub use anthropic::MessagesClient;
pub use chat::ChatCompletionsClient;
pub use completions::CompletionsClient;
pub use responses::ResponsesClient;

/// A typed response paired with the raw wire document it was decoded from.
///
/// Shape verification must run against `raw`: the typed decode proves the
/// documented fields are well formed, but only the raw document shows
/// whether the server sent extra or missing keys.
#[derive(Debug, Clone)]
pub struct Captured<T> {
    /// The strictly-typed decode of the response body.
    pub parsed: T,
    /// The response body as received.
    pub raw: Value,
}

/// Prompt/completion/total usage block shared by the two OpenAI-style
/// completion surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// The `httpbun` request field that overrides the placeholder content.
///
/// Chat and messages read `content`; the responses surface reads
/// `output_text`. An empty override is ignored by the mock.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MockDirective {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
}

impl MockDirective {
    /// Override the placeholder content (chat and messages surfaces).
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            output_text: None,
        }
    }

    /// Override the placeholder output text (responses surface).
    pub fn output_text(text: impl Into<String>) -> Self {
        Self {
            content: None,
            output_text: Some(text.into()),
        }
    }
}

/// A normalized view of one request/response cycle, used by the
/// cross-surface property checks.
#[derive(Debug, Clone)]
pub struct SurfaceProbe {
    /// The response identifier.
    pub id: String,
    /// The model name echoed by the mock.
    pub model: String,
    /// The placeholder (or overridden) text content.
    pub text: String,
    /// Input-side token count.
    pub input_tokens: u64,
    /// Output-side token count.
    pub output_tokens: u64,
    /// The raw wire document.
    pub raw: Value,
}

/// The seam the property matrix runs across: every surface can issue one
/// canonical request and verify one raw document.
#[async_trait]
pub trait ConformanceSurface: Send + Sync {
    /// Surface name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Endpoint path joined onto the base URL.
    fn endpoint(&self) -> &'static str;

    /// The model name the original suites use on this surface.
    fn canonical_model(&self) -> &'static str;

    /// Identifier format minted by this surface.
    fn id_format(&self) -> &'static regex::Regex;

    /// The placeholder text this surface returns.
    fn placeholder(&self) -> &'static str;

    /// Issue a single-text-input request and normalize the response.
    async fn probe(&self, model: &str, input: &str) -> ConformanceResult<SurfaceProbe>;

    /// Verify a raw document against this surface's documented shape.
    fn verify_shape(&self, raw: &Value) -> ConformanceResult<()>;
}

/// POST a JSON body and decode the JSON response.
///
/// Single execution path for every surface client: transport failures map to
/// [`ConformanceError::RequestFailed`], non-2xx statuses to
/// [`ConformanceError::ApiError`] with the body preserved verbatim, and
/// undecodable bodies to [`ConformanceError::ResponseParsingError`].
pub(crate) async fn post_json(
    http: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &impl Serialize,
) -> ConformanceResult<Value> {
    log_debug!(url = %url, "Dispatching request");

    let response = http
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            log_error!(url = %url, error = %e, "HTTP request failed");
            ConformanceError::request_failed(format!("Request to {url} failed: {e}"), Some(Box::new(e)))
        })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        ConformanceError::request_failed(
            format!("Failed to read response body from {url}: {e}"),
            Some(Box::new(e)),
        )
    })?;

    if !status.is_success() {
        return Err(ConformanceError::api_error(status.as_u16(), text));
    }

    serde_json::from_str(&text).map_err(|e| {
        ConformanceError::response_parsing_error(format!(
            "Response from {url} is not valid JSON: {e}"
        ))
    })
}

/// Decode a raw document into its strict typed form.
///
/// All response types use `deny_unknown_fields`, so this also fails when the
/// server sends a key outside the documented set.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    surface: &str,
    raw: &Value,
) -> ConformanceResult<T> {
    serde_json::from_value(raw.clone()).map_err(|e| {
        ConformanceError::response_parsing_error(format!(
            "{surface} response does not match the documented structure: {e}"
        ))
    })
}

/// Build the reqwest client every surface uses.
pub(crate) fn build_http_client(config: &HarnessConfig) -> ConformanceResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| {
            ConformanceError::configuration_error(format!("Failed to build HTTP client: {e}"))
        })
}
