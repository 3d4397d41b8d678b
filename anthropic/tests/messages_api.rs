//! Integration tests for the Messages API client against a mock server

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::time::Duration;
use studio_anthropic::{AnthropicClient, ClaudeError, MessagesRequest, types::Message};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn success_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_01",
        "model": "claude-sonnet-4-5-20250929",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 40, "output_tokens": 22}
    })
}

#[tokio::test]
async fn sends_sampling_parameters_and_reads_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({"top_k": 40, "max_tokens": 300})))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("See you Friday, Ana!")))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new("test-key").with_base_url(server.uri());
    let request = MessagesRequest::new(vec![Message::user("Confirm Ana's haircut")])
        .with_max_tokens(300)
        .with_temperature(0.7)
        .with_top_p(0.95)
        .with_top_k(40);

    let response = client.messages(request).await.unwrap();
    assert_eq!(response.text(), "See you Friday, Ana!");
}

#[tokio::test]
async fn maps_status_codes_to_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = AnthropicClient::new("k").with_base_url(server.uri());
    let result = client
        .messages(MessagesRequest::new(vec![Message::user("hi")]))
        .await;
    assert!(matches!(result, Err(ClaudeError::RateLimited)));
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = AnthropicClient::new("k").with_base_url(server.uri());
    let err = client
        .messages(MessagesRequest::new(vec![Message::user("hi")]))
        .await
        .unwrap_err();

    match err {
        ClaudeError::ApiError { status, message } => {
            assert_eq!(status, 529);
            assert_eq!(message, "overloaded");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = AnthropicClient::new("k")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(50))
        .unwrap();
    let result = client
        .messages(MessagesRequest::new(vec![Message::user("hi")]))
        .await;
    assert!(matches!(result, Err(ClaudeError::Timeout)));
}

#[tokio::test]
async fn malformed_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = AnthropicClient::new("k").with_base_url(server.uri());
    let result = client
        .messages(MessagesRequest::new(vec![Message::user("hi")]))
        .await;
    assert!(matches!(result, Err(ClaudeError::ResponseParseFailed(_))));
}
