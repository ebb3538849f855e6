//! # llm-conformance
//!
//! Strict conformance harness for mock LLM chat-completion API endpoints.
//!
//! The harness drives thin typed clients against a deterministic mock backend
//! (an httpbun-style `/llm` route set) and verifies the wire contract down to
//! the last key: exact field sets at every nesting level, literal placeholder
//! strings, fixed token counts for canonical inputs, and identifier formats.
//!
//! ## Surfaces
//!
//! - **Chat completions** (`/chat/completions`) - OpenAI chat-completion style
//! - **Completions** (`/completions`) - legacy text-completion style
//! - **Responses** (`/responses`) - structured output-item style
//! - **Messages** (`/v1/messages`) - Anthropic messages style
//!
//! Every client returns a [`Captured`] pair of the typed decode and the raw
//! wire document, so shape checks see exactly what the server sent rather
//! than what the deserializer kept.
//!
//! ## Example
//!
//! ```rust,no_run
//! use llm_conformance::{ChatCompletionsClient, ChatMessage, HarnessConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HarnessConfig::from_env()?;
//! let client = ChatCompletionsClient::new(config)?;
//!
//! let captured = client
//!     .create("gpt-5-nano", &[ChatMessage::user("Hello")])
//!     .await?;
//!
//! llm_conformance::surfaces::chat::verify_shape(&captured.raw)?;
//! assert_eq!(captured.parsed.usage.prompt_tokens, 3);
//! # Ok(())
//! # }
//! ```

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod config;
pub mod error;
pub mod expectations;
pub mod shape;
pub mod surfaces;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::{HarnessConfig, BASE_URL_ENV};
pub use error::{ConformanceError, ConformanceResult, ErrorCategory};
pub use surfaces::anthropic::{MessageParam, MessagesClient};
pub use surfaces::chat::{ChatCompletionsClient, ChatMessage};
pub use surfaces::completions::{CompletionsClient, Prompt};
pub use surfaces::responses::{ResponseInput, ResponsesClient};
pub use surfaces::{Captured, ConformanceSurface, MockDirective, SurfaceProbe, TokenUsage};
