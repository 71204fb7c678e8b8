use async_openai::config::OpenAIConfig;
use async_openai::Client;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orda_core::{Embedding, EmbeddingError};
use orda_embeddings::OpenAiEmbedding;

fn embedder(server: &MockServer, dimension: usize) -> OpenAiEmbedding {
    let config = OpenAIConfig::new()
        .with_api_key("sk-orda")
        .with_api_base(format!("{}/v1", server.uri()));
    OpenAiEmbedding::with_client(Client::with_config(config), "text-embedding-3-small", dimension)
}

fn vectors(rows: &[(usize, &[f32])]) -> Value {
    json!({
        "object": "list",
        "model": "text-embedding-3-small",
        "data": rows
            .iter()
            .map(|(index, v)| json!({ "object": "embedding", "index": index, "embedding": v }))
            .collect::<Vec<_>>(),
        "usage": { "prompt_tokens": 4, "total_tokens": 4 }
    })
}

#[tokio::test]
async fn news_text_is_embedded_with_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-orda"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "input": ["반도체 수출 감소"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(vectors(&[(0, &[0.5, 0.25, 0.125])])))
        .mount(&server)
        .await;

    let vector = embedder(&server, 3).embed("  반도체 수출 감소\n").await.unwrap();
    assert_eq!(vector, vec![0.5, 0.25, 0.125]);
}

#[tokio::test]
async fn batch_vectors_are_returned_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vectors(&[(1, &[0.0, 1.0]), (0, &[1.0, 0.0])])),
        )
        .mount(&server)
        .await;

    let out = embedder(&server, 2)
        .embed_batch(&["항공".to_string(), "해운".to_string()])
        .await
        .unwrap();
    assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn wrong_dimension_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vectors(&[(0, &[0.1])])))
        .mount(&server)
        .await;

    let err = embedder(&server, 1536).embed("환율").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn missing_vectors_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vectors(&[(0, &[0.1, 0.2])])))
        .mount(&server)
        .await;

    let err = embedder(&server, 2)
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn blank_text_fails_without_a_request() {
    let server = MockServer::start().await;

    let err = embedder(&server, 3).embed(" \n ").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Provider(_)));

    let out = embedder(&server, 3).embed_batch(&[]).await.unwrap();
    assert!(out.is_empty());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
