//! Test helper utilities shared across integration test files.
//!
//! Two kinds of helpers live here:
//! - live-endpoint plumbing: the `BASE_URL` gate and client constructors
//! - wiremock fixtures: response bodies matching the mock's wire format,
//!   used by the client tests that run without a live endpoint

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use llm_conformance::{
    ChatCompletionsClient, CompletionsClient, HarnessConfig, MessagesClient, ResponsesClient,
    BASE_URL_ENV,
};
use serde_json::{json, Value};
use std::time::Duration;

/// 24-char hex suffix used in wiremock fixture identifiers.
pub const FIXTURE_HEX: &str = "89abcdef0123456789abcdef";

/// Read the live mock base URL, if configured.
///
/// Conformance tests skip (with a note on stderr) when `BASE_URL` is not
/// set, so the suite stays green in environments without the mock server.
pub fn live_base_url() -> Option<String> {
    match std::env::var(BASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Some(url.trim().to_string()),
        _ => {
            eprintln!("skipping: {BASE_URL_ENV} is not set");
            None
        }
    }
}

/// Harness configuration for a given base URL with a short test timeout.
pub fn test_config(base_url: &str) -> HarnessConfig {
    HarnessConfig::new(base_url).with_request_timeout(Duration::from_secs(10))
}

pub fn chat_client(base_url: &str) -> ChatCompletionsClient {
    ChatCompletionsClient::new(test_config(base_url)).expect("Failed to create chat client")
}

pub fn completions_client(base_url: &str) -> CompletionsClient {
    CompletionsClient::new(test_config(base_url)).expect("Failed to create completions client")
}

pub fn responses_client(base_url: &str) -> ResponsesClient {
    ResponsesClient::new(test_config(base_url)).expect("Failed to create responses client")
}

pub fn messages_client(base_url: &str) -> MessagesClient {
    MessagesClient::new(test_config(base_url)).expect("Failed to create messages client")
}

// ============================================================================
// Wiremock fixture bodies (mirroring the mock's wire format)
// ============================================================================

/// Chat completion fixture body.
pub fn chat_fixture(model: &str, prompt_tokens: u64) -> Value {
    json!({
        "id": format!("chatcmpl-{FIXTURE_HEX}"),
        "object": "chat.completion",
        "created": chrono_now(),
        "model": model,
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": llm_conformance::expectations::CHAT_PLACEHOLDER,
            },
            "finish_reason": "stop",
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": 29,
            "total_tokens": prompt_tokens + 29,
        },
    })
}

/// Legacy completion fixture body.
pub fn completion_fixture(model: &str, prompt_tokens: u64) -> Value {
    json!({
        "id": format!("cmpl-{FIXTURE_HEX}"),
        "object": "text_completion",
        "created": chrono_now(),
        "model": model,
        "choices": [{
            "text": llm_conformance::expectations::COMPLETION_PLACEHOLDER,
            "index": 0,
            "logprobs": null,
            "finish_reason": "stop",
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": 22,
            "total_tokens": prompt_tokens + 22,
        },
    })
}

/// Responses fixture body.
pub fn responses_fixture(model: &str, input_tokens: u64) -> Value {
    json!({
        "id": format!("resp-{FIXTURE_HEX}"),
        "object": "response",
        "created_at": chrono_now() as f64,
        "model": model,
        "status": "completed",
        "error": null,
        "output": [{
            "id": format!("msg-{FIXTURE_HEX}"),
            "type": "message",
            "role": "assistant",
            "status": "completed",
            "content": [{
                "type": "output_text",
                "text": llm_conformance::expectations::RESPONSES_PLACEHOLDER,
                "annotations": [],
                "logprobs": null,
            }],
        }],
        "output_text": llm_conformance::expectations::RESPONSES_PLACEHOLDER,
        "usage": {
            "input_tokens": input_tokens,
            "output_tokens": 29,
            "total_tokens": input_tokens + 29,
            "input_tokens_details": { "cached_tokens": 0 },
            "output_tokens_details": { "reasoning_tokens": 0 },
        },
        "parallel_tool_calls": false,
        "tool_choice": "auto",
        "tools": [],
    })
}

/// Anthropic message fixture body.
pub fn anthropic_fixture(model: &str, input_tokens: u64) -> Value {
    json!({
        "id": format!("msg-{FIXTURE_HEX}"),
        "type": "message",
        "role": "assistant",
        "content": [{
            "type": "text",
            "text": llm_conformance::expectations::ANTHROPIC_PLACEHOLDER,
            "citations": null,
        }],
        "model": model,
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {
            "input_tokens": input_tokens,
            "output_tokens": 33,
        },
    })
}

fn chrono_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(1)
}
