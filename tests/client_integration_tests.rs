//! HTTP integration tests for the surface clients, using wiremock.
//!
//! UNIT UNDER TEST: request dispatch and response handling of all four
//! surface clients.
//!
//! TEST COVERAGE:
//!   - Endpoint paths joined onto the base URL
//!   - Authentication and content-type headers per surface
//!   - Request body serialization (messages, prompts, mock directives)
//!   - Typed decode plus raw capture of successful responses
//!   - Strict decode rejection of undocumented fields
//!   - Error mapping for HTTP error statuses, invalid JSON, and
//!     unreachable servers

mod common;

use llm_conformance::expectations::{ANTHROPIC_PLACEHOLDER, CHAT_PLACEHOLDER, COMPLETION_PLACEHOLDER, RESPONSES_PLACEHOLDER};
use llm_conformance::surfaces::chat::ChatCompletionRequest;
use llm_conformance::{ChatMessage, ConformanceError, MessageParam, MockDirective};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Chat completions client
// ============================================================================

#[tokio::test]
async fn chat_client_posts_to_chat_completions_with_bearer_auth() {
    let mock_server = MockServer::start().await;
    let fixture = common::chat_fixture("gpt-5-nano", 3);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer dummy-key"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "model": "gpt-5-nano",
            "messages": [{"role": "user", "content": "Hello"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::chat_client(&mock_server.uri());
    let captured = client
        .create("gpt-5-nano", &[ChatMessage::user("Hello")])
        .await
        .expect("request should succeed");

    assert_eq!(captured.parsed.choices[0].message.content, CHAT_PLACEHOLDER);
    assert_eq!(captured.raw, fixture, "raw capture should be the body as sent");
}

#[tokio::test]
async fn chat_client_sends_mock_directive_in_body() {
    let mock_server = MockServer::start().await;
    let mut fixture = common::chat_fixture("gpt-5-nano", 3);
    fixture["choices"][0]["message"]["content"] = json!("override");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"httpbun": {"content": "override"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::chat_client(&mock_server.uri());
    let mut request = ChatCompletionRequest::new("gpt-5-nano", vec![ChatMessage::user("Hello")]);
    request.mock = Some(MockDirective::content("override"));

    let captured = client.create_request(&request).await.expect("request should succeed");
    assert_eq!(captured.parsed.choices[0].message.content, "override");
}

#[tokio::test]
async fn chat_client_rejects_undocumented_response_field() {
    let mock_server = MockServer::start().await;
    let mut fixture = common::chat_fixture("gpt-5-nano", 3);
    fixture["system_fingerprint"] = json!(null);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .mount(&mock_server)
        .await;

    let client = common::chat_client(&mock_server.uri());
    let err = client
        .create("gpt-5-nano", &[ChatMessage::user("Hello")])
        .await
        .expect_err("extra field should fail the strict decode");
    assert!(matches!(err, ConformanceError::ResponseParsingError { .. }));
}

#[tokio::test]
async fn chat_client_maps_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "Internal server error", "type": "server_error"}
        })))
        .mount(&mock_server)
        .await;

    let client = common::chat_client(&mock_server.uri());
    let err = client
        .create("gpt-5-nano", &[ChatMessage::user("Hello")])
        .await
        .expect_err("500 should surface as an API error");
    match err {
        ConformanceError::ApiError { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Internal server error"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_client_maps_invalid_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = common::chat_client(&mock_server.uri());
    let err = client
        .create("gpt-5-nano", &[ChatMessage::user("Hello")])
        .await
        .expect_err("non-JSON body should fail parsing");
    assert!(matches!(err, ConformanceError::ResponseParsingError { .. }));
}

#[tokio::test]
async fn chat_client_maps_unreachable_server() {
    // Nothing listens on port 1
    let client = common::chat_client("http://127.0.0.1:1");
    let err = client
        .create("gpt-5-nano", &[ChatMessage::user("Hello")])
        .await
        .expect_err("connection failure should surface as a request error");
    assert!(matches!(err, ConformanceError::RequestFailed { .. }));
}

// ============================================================================
// Legacy completions client
// ============================================================================

#[tokio::test]
async fn completions_client_posts_bare_prompt() {
    let mock_server = MockServer::start().await;
    let fixture = common::completion_fixture("gpt-3.5-turbo-instruct", 2);

    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(header("authorization", "Bearer dummy-key"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo-instruct",
            "prompt": "Hello",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::completions_client(&mock_server.uri());
    let captured = client
        .create("gpt-3.5-turbo-instruct", "Hello")
        .await
        .expect("request should succeed");

    assert_eq!(captured.parsed.choices[0].text, COMPLETION_PLACEHOLDER);
    assert_eq!(captured.parsed.usage.prompt_tokens, 2);
}

// ============================================================================
// Responses client
// ============================================================================

#[tokio::test]
async fn responses_client_posts_string_input() {
    let mock_server = MockServer::start().await;
    let fixture = common::responses_fixture("gpt-5-nano", 3);

    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("authorization", "Bearer dummy-key"))
        .and(body_partial_json(json!({"model": "gpt-5-nano", "input": "Hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::responses_client(&mock_server.uri());
    let captured = client
        .create("gpt-5-nano", "Hello")
        .await
        .expect("request should succeed");

    assert_eq!(captured.parsed.output_text, RESPONSES_PLACEHOLDER);
    assert_eq!(captured.raw, fixture);
}

#[tokio::test]
async fn responses_client_rejects_undocumented_usage_field() {
    let mock_server = MockServer::start().await;
    let mut fixture = common::responses_fixture("gpt-5-nano", 3);
    fixture["usage"]["audio_tokens"] = json!(0);

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .mount(&mock_server)
        .await;

    let client = common::responses_client(&mock_server.uri());
    let err = client
        .create("gpt-5-nano", "Hello")
        .await
        .expect_err("extra nested field should fail the strict decode");
    assert!(matches!(err, ConformanceError::ResponseParsingError { .. }));
}

#[tokio::test]
async fn responses_client_maps_bad_request_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Invalid JSON in request body", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let client = common::responses_client(&mock_server.uri());
    let err = client
        .create("gpt-5-nano", "Hello")
        .await
        .expect_err("400 should surface as an API error");
    match err {
        ConformanceError::ApiError { status, .. } => assert_eq!(status, 400),
        other => panic!("expected ApiError, got {other:?}"),
    }
}

// ============================================================================
// Anthropic messages client
// ============================================================================

#[tokio::test]
async fn messages_client_posts_with_anthropic_headers() {
    let mock_server = MockServer::start().await;
    let fixture = common::anthropic_fixture("claude-3-5-sonnet-20241022", 3);

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "dummy-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": "Hello"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::messages_client(&mock_server.uri());
    let captured = client
        .create("claude-3-5-sonnet-20241022", &[MessageParam::user("Hello")])
        .await
        .expect("request should succeed");

    assert_eq!(captured.parsed.content[0].text, ANTHROPIC_PLACEHOLDER);
    assert_eq!(captured.raw, fixture);
}

#[tokio::test]
async fn messages_client_rejects_undocumented_usage_field() {
    let mock_server = MockServer::start().await;
    let mut fixture = common::anthropic_fixture("claude-3-5-sonnet-20241022", 3);
    fixture["usage"]["cache_read_input_tokens"] = json!(0);

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .mount(&mock_server)
        .await;

    let client = common::messages_client(&mock_server.uri());
    let err = client
        .create("claude-3-5-sonnet-20241022", &[MessageParam::user("Hello")])
        .await
        .expect_err("extra usage field should fail the strict decode");
    assert!(matches!(err, ConformanceError::ResponseParsingError { .. }));
}

#[tokio::test]
async fn messages_client_maps_method_not_allowed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(405).set_body_json(json!({
            "error": {"type": "method_not_allowed", "message": "Method not allowed"}
        })))
        .mount(&mock_server)
        .await;

    let client = common::messages_client(&mock_server.uri());
    let err = client
        .create("claude-3-5-sonnet-20241022", &[MessageParam::user("Hello")])
        .await
        .expect_err("405 should surface as an API error");
    match err {
        ConformanceError::ApiError { status, .. } => assert_eq!(status, 405),
        other => panic!("expected ApiError, got {other:?}"),
    }
}

// ============================================================================
// Base URL handling
// ============================================================================

#[tokio::test]
async fn trailing_slash_in_base_url_does_not_double_up() {
    let mock_server = MockServer::start().await;
    let fixture = common::chat_fixture("gpt-5-nano", 3);

    Mock::given(method("POST"))
        .and(path("/llm/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Configure with a path segment and a trailing slash
    let base = format!("{}/llm/", mock_server.uri());
    let client = common::chat_client(&base);
    client
        .create("gpt-5-nano", &[ChatMessage::user("Hello")])
        .await
        .expect("request should succeed");
}
