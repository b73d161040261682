//! Integration tests for `AnthropicClient` against a local `wiremock` server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adgap_engine::{AnthropicClient, EngineError, TextGenerator};

fn client(server: &MockServer) -> AnthropicClient {
    AnthropicClient::new(&server.uri(), "test-key", "test-model", 512, 5)
        .expect("failed to build test AnthropicClient")
}

#[tokio::test]
async fn sends_messages_request_and_joins_text_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 512,
            "system": "be terse",
            "messages": [{"role": "user", "content": "classify these"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "content": [
                {"type": "text", "text": "[{\"index\": 0"},
                {"type": "text", "text": "}]"}
            ],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .generate("be terse", "classify these")
        .await
        .unwrap();
    assert_eq!(text, "[{\"index\": 0}]");
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).generate("s", "p").await.unwrap_err();
    match err {
        EngineError::Generation(message) => {
            assert!(message.contains("529"), "message: {message}");
            assert!(message.contains("Overloaded"), "message: {message}");
        }
        other => panic!("expected Generation error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_content_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .mount(&server)
        .await;

    let err = client(&server).generate("s", "p").await.unwrap_err();
    assert!(matches!(err, EngineError::Generation(_)));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "ok"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnthropicClient::new(&format!("{}/", server.uri()), "k", "m", 16, 5).unwrap();
    assert_eq!(client.generate("s", "p").await.unwrap(), "ok");
}
