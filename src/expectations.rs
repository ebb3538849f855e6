//! The documented mock contract, as constants.
//!
//! The mock returns fixed placeholder text regardless of input, estimates
//! tokens at roughly four characters each, and mints a fresh identifier per
//! response as a route prefix followed by 24 lowercase hex characters. The
//! constants here pin the observable half of that behavior; the harness does
//! not reimplement the estimation itself.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Placeholder content
// ============================================================================

/// Fixed content returned by the chat completions surface.
pub const CHAT_PLACEHOLDER: &str = "This is a mock chat response from httpbun. \
    I received your messages and I'm responding with this placeholder text.";

/// Fixed text returned by the legacy completions surface.
pub const COMPLETION_PLACEHOLDER: &str =
    "This is a mock completion response from httpbun. Your prompt was received successfully.";

/// Fixed output text returned by the responses surface.
pub const RESPONSES_PLACEHOLDER: &str = "This is a mock responses API response from httpbun. \
    I received your input and I'm responding with this placeholder text.";

/// Fixed text returned by the Anthropic messages surface.
pub const ANTHROPIC_PLACEHOLDER: &str =
    "This is a mock Anthropic messages API response from httpbun. \
    I received your messages and I'm responding with this placeholder text.";

// ============================================================================
// Canonical token counts
// ============================================================================

/// The canonical single-word input used throughout the suite.
pub const CANONICAL_INPUT: &str = "Hello";

/// Prompt/input tokens for the canonical input on the chat, responses, and
/// messages surfaces. Chat and messages count the role prefix; responses
/// pads the bare estimate by one. All three land on the same constant.
pub const CANONICAL_INPUT_TOKENS: u64 = 3;

/// Completion tokens for the chat placeholder.
pub const CHAT_OUTPUT_TOKENS: u64 = 29;

/// Total tokens for the canonical chat scenario.
pub const CHAT_TOTAL_TOKENS: u64 = 32;

/// Output tokens on the responses surface (fixed, not estimated).
pub const RESPONSES_OUTPUT_TOKENS: u64 = 29;

/// Total tokens for the canonical responses scenario.
pub const RESPONSES_TOTAL_TOKENS: u64 = 32;

/// Output tokens for the Anthropic placeholder.
pub const ANTHROPIC_OUTPUT_TOKENS: u64 = 33;

/// Prompt tokens for the canonical input on the legacy completions surface,
/// which counts the prompt bare (no role prefix, no padding).
pub const COMPLETION_PROMPT_TOKENS: u64 = 2;

/// Completion tokens for the legacy completions placeholder.
pub const COMPLETION_OUTPUT_TOKENS: u64 = 22;

// ============================================================================
// Identifier formats
// ============================================================================

/// Chat completion id: `chatcmpl-` + 24 hex chars.
pub static CHAT_ID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^chatcmpl-[0-9a-f]{24}$").expect("valid regex"));

/// Legacy completion id: `cmpl-` + 24 hex chars.
pub static COMPLETION_ID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^cmpl-[0-9a-f]{24}$").expect("valid regex"));

/// Response id: `resp-` + 24 hex chars.
pub static RESPONSE_ID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^resp-[0-9a-f]{24}$").expect("valid regex"));

/// Message id (Anthropic responses and responses-surface output items):
/// `msg-` + 24 hex chars.
pub static MESSAGE_ID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^msg-[0-9a-f]{24}$").expect("valid regex"));

// ============================================================================
// Exact key sets, per surface, per nesting level
// ============================================================================
//
// These are the keys as the mock serializes them on the wire. Optional
// fields are explicit nulls, so they appear here too.

/// Top-level keys of a chat completion document.
pub const CHAT_TOP_KEYS: &[&str] = &["id", "object", "created", "model", "choices", "usage"];

/// Keys of a chat completion choice.
pub const CHAT_CHOICE_KEYS: &[&str] = &["index", "message", "finish_reason"];

/// Keys of the assistant message inside a chat choice.
pub const CHAT_MESSAGE_KEYS: &[&str] = &["role", "content"];

/// Keys of the prompt/completion/total usage block.
pub const COMPLETION_USAGE_KEYS: &[&str] =
    &["prompt_tokens", "completion_tokens", "total_tokens"];

/// Top-level keys of a legacy completion document.
pub const COMPLETION_TOP_KEYS: &[&str] =
    &["id", "object", "created", "model", "choices", "usage"];

/// Keys of a legacy completion choice.
pub const COMPLETION_CHOICE_KEYS: &[&str] = &["text", "index", "logprobs", "finish_reason"];

/// Top-level keys of a responses-surface document.
pub const RESPONSES_TOP_KEYS: &[&str] = &[
    "id",
    "object",
    "created_at",
    "model",
    "status",
    "error",
    "output",
    "output_text",
    "usage",
    "parallel_tool_calls",
    "tool_choice",
    "tools",
];

/// Keys of a responses-surface output item.
pub const RESPONSES_OUTPUT_KEYS: &[&str] = &["id", "type", "role", "status", "content"];

/// Keys of a responses-surface output content block.
pub const RESPONSES_CONTENT_KEYS: &[&str] = &["type", "text", "annotations", "logprobs"];

/// Keys of the responses-surface usage block.
pub const RESPONSES_USAGE_KEYS: &[&str] = &[
    "input_tokens",
    "output_tokens",
    "total_tokens",
    "input_tokens_details",
    "output_tokens_details",
];

/// Keys of the nested input token details.
pub const RESPONSES_INPUT_DETAILS_KEYS: &[&str] = &["cached_tokens"];

/// Keys of the nested output token details.
pub const RESPONSES_OUTPUT_DETAILS_KEYS: &[&str] = &["reasoning_tokens"];

/// Top-level keys of an Anthropic message document.
pub const ANTHROPIC_TOP_KEYS: &[&str] = &[
    "id",
    "type",
    "role",
    "content",
    "model",
    "stop_reason",
    "stop_sequence",
    "usage",
];

/// Keys of an Anthropic content block.
pub const ANTHROPIC_CONTENT_KEYS: &[&str] = &["type", "text", "citations"];

/// Keys of the Anthropic usage block.
pub const ANTHROPIC_USAGE_KEYS: &[&str] = &["input_tokens", "output_tokens"];
