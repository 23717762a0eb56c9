//! Exercises the retry/backoff and failure-classification contract of
//! `LlmClient::decide` against a mock chat-completions endpoint (§4.5).

use auspex_core_types::{LlmEndpoint, SamplingParams};
use auspex_llm_client::{LlmClient, LlmClientError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sampling() -> SamplingParams {
    SamplingParams {
        temperature: 0.2,
        max_output_tokens: 256,
        top_p: None,
        frequency_penalty: None,
        presence_penalty: None,
    }
}

fn endpoint(base_url: String) -> LlmEndpoint {
    LlmEndpoint { base_url, api_key: "test-key".to_string(), model: "gpt-4o-mini".to_string() }
}

fn success_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"content": content}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15},
    })
}

#[tokio::test]
async fn succeeds_on_first_attempt_and_returns_parsed_json_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(r#"{"type":"wait","ms":100}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::new(endpoint(server.uri()), sampling());
    let (data, usage) = client.decide("system", "user", None).await.expect("should succeed");
    assert_eq!(data["type"], "wait");
    assert_eq!(usage.total_tokens, 15);
}

#[tokio::test]
async fn retries_on_429_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(r#"{"type":"done","result":"ok"}"#)))
        .mount(&server)
        .await;

    let client = LlmClient::new(endpoint(server.uri()), sampling());
    let (data, _usage) = client.decide("system", "user", None).await.expect("should eventually succeed");
    assert_eq!(data["type"], "done");
}

#[tokio::test]
async fn non_transient_400_fails_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::new(endpoint(server.uri()), sampling());
    let err = client.decide("system", "user", None).await.unwrap_err();
    assert!(matches!(err, LlmClientError::Fatal(_)));
}

#[tokio::test]
async fn truncated_response_fails() {
    let server = MockServer::start().await;
    let body = json!({
        "choices": [{"message": {"content": "{\"type\":\"wait\""}, "finish_reason": "length"}],
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = LlmClient::new(endpoint(server.uri()), sampling());
    let err = client.decide("system", "user", None).await.unwrap_err();
    assert!(matches!(err, LlmClientError::Fatal(_)));
}

#[tokio::test]
async fn empty_content_fails() {
    let server = MockServer::start().await;
    let body = json!({
        "choices": [{"message": {"content": ""}, "finish_reason": "stop"}],
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = LlmClient::new(endpoint(server.uri()), sampling());
    let err = client.decide("system", "user", None).await.unwrap_err();
    assert!(matches!(err, LlmClientError::Fatal(_)));
}
