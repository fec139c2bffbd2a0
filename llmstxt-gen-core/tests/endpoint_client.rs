//! Integration tests for OllamaClient using wiremock

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llmstxt_gen_core::contract::{EndpointError, GenerationRequest, ModelEndpoint};
use llmstxt_gen_core::endpoint::OllamaClient;

fn tags_body() -> serde_json::Value {
    serde_json::json!({
        "models": [
            { "name": "llama2:latest", "size": 3826793677u64, "digest": "abc" },
            { "name": "mistral:7b-instruct", "size": 4109865159u64, "digest": "def" },
            { "name": "phi", "size": 1602463008u64, "digest": "ghi" }
        ]
    })
}

#[tokio::test]
async fn test_check_connectivity_ok() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    assert!(client.check_connectivity().await.is_ok());
}

#[tokio::test]
async fn test_check_connectivity_failure_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    match client.check_connectivity().await {
        Err(EndpointError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "loading");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_check_connectivity_unreachable() {
    // Nothing listens on the discard port.
    let client = OllamaClient::new("http://127.0.0.1:9");
    match client.check_connectivity().await {
        Err(EndpointError::Transport(_)) => {}
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_models_strips_tags() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags_body()))
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&format!("{}/", mock_server.uri()));
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec!["llama2", "mistral", "phi"]);
}

#[tokio::test]
async fn test_list_models_empty_and_missing_field() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    assert!(client.list_models().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_models_malformed_body_is_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    assert!(matches!(
        client.list_models().await,
        Err(EndpointError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_generate_sends_wire_body_and_returns_text() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(serde_json::json!({
            "model": "llama2",
            "prompt": "background\n\nwrite it",
            "stream": false,
            "temperature": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama2",
            "response": "# Demo\n\n> A demo project.",
            "done": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    let request = GenerationRequest::new("llama2", "write it", Some("background"));
    let text = client.generate(&request).await.unwrap();
    assert_eq!(text, "# Demo\n\n> A demo project.");
}

#[tokio::test]
async fn test_generate_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    let request = GenerationRequest::new("llama2", "p", None);
    let err = client.generate(&request).await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("model crashed"));
}

#[tokio::test]
async fn test_generate_missing_response_field() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "done": true })),
        )
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    let request = GenerationRequest::new("llama2", "p", None);
    assert!(matches!(
        client.generate(&request).await,
        Err(EndpointError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_generate_empty_response_is_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "" })),
        )
        .mount(&mock_server)
        .await;

    let client = OllamaClient::new(&mock_server.uri());
    let request = GenerationRequest::new("llama2", "p", None);
    assert!(matches!(
        client.generate(&request).await,
        Err(EndpointError::EmptyResponse)
    ));
}
