//! Tests of the HTTP inference client and fallback adapter against a local
//! mock server.

use std::sync::Arc;

use guest_feedback_rust::config::InferenceConfig;
use guest_feedback_rust::inference::{
    AiFallbackAdapter, HttpInferenceClient, FALLBACK_CONFIDENCE, FALLBACK_REASON,
};
use guest_feedback_rust::models::Sentiment;
use mockito::Matcher;

fn config(endpoint: &str, api_token: Option<&str>) -> InferenceConfig {
    InferenceConfig {
        endpoint: endpoint.to_string(),
        api_token: api_token.map(ToString::to_string),
        request_timeout_secs: 5,
    }
}

fn adapter(endpoint: &str, api_token: Option<&str>) -> AiFallbackAdapter {
    let client =
        HttpInferenceClient::new(&config(endpoint, api_token)).expect("client builds");
    AiFallbackAdapter::new(Arc::new(client))
}

#[tokio::test]
async fn test_flat_response_is_classified() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Json(serde_json::json!({
            "inputs": "an unremarkable evening"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"label":"LABEL_0","score":0.11},{"label":"LABEL_1","score":0.05},{"label":"LABEL_2","score":0.84}]"#,
        )
        .create_async()
        .await;

    let result = adapter(&server.url(), None)
        .classify("an unremarkable evening")
        .await;

    mock.assert_async().await;
    assert_eq!(result.sentiment, Sentiment::Favourable);
    assert!((result.confidence - 0.84).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_nested_response_is_unwrapped_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[[{"label":"LABEL_0","score":0.78},{"label":"LABEL_2","score":0.12}]]"#)
        .create_async()
        .await;

    let result = adapter(&server.url(), None).classify("some comment").await;

    mock.assert_async().await;
    assert_eq!(result.sentiment, Sentiment::Unfavourable);
    assert!((result.confidence - 0.78).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_bearer_token_is_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"label":"LABEL_1","score":0.6}]"#)
        .create_async()
        .await;

    let result = adapter(&server.url(), Some("secret-token"))
        .classify("some comment")
        .await;

    mock.assert_async().await;
    assert_eq!(result.sentiment, Sentiment::Neutral);
}

#[tokio::test]
async fn test_error_status_degrades_to_neutral() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(503)
        .with_body("model loading")
        .create_async()
        .await;

    let result = adapter(&server.url(), None).classify("some comment").await;

    mock.assert_async().await;
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert!((result.confidence - FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
    assert_eq!(result.reason, FALLBACK_REASON);
}

#[tokio::test]
async fn test_malformed_body_degrades_to_neutral() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"unexpected shape"}"#)
        .create_async()
        .await;

    let result = adapter(&server.url(), None).classify("some comment").await;

    mock.assert_async().await;
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.reason, FALLBACK_REASON);
}

#[tokio::test]
async fn test_empty_list_degrades_to_neutral() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let result = adapter(&server.url(), None).classify("some comment").await;

    mock.assert_async().await;
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert!((result.confidence - FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_unreachable_endpoint_degrades_to_neutral() {
    // Nothing listens on this port
    let result = adapter("http://127.0.0.1:9", None)
        .classify("some comment")
        .await;

    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.reason, FALLBACK_REASON);
}
