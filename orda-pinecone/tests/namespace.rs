use std::sync::Arc;

use orda_core::{Embedding, EmbeddingError};
use orda_pinecone::{PineconeStoreError, PineconeVectorStore};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct NoEmbedding;

#[async_trait::async_trait]
impl Embedding for NoEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.0; 4])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
    }

    fn dimension(&self) -> usize {
        4
    }
}

async fn store(server: &MockServer, namespace: &str) -> PineconeVectorStore {
    PineconeVectorStore::builder(Arc::new(NoEmbedding))
        .base_url(server.uri())
        .api_key(SecretString::new("key".to_string()))
        .namespace(namespace)
        .build()
        .await
        .unwrap()
}

async fn mount_stats(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dimension": 4,
            "namespaces": {"industry": {"vectorCount": 42}},
            "totalVectorCount": 42
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn stats_report_namespaces() {
    let server = MockServer::start().await;
    mount_stats(&server).await;

    let industry = store(&server, "industry").await;
    let stats = industry.describe_index_stats().await.unwrap();
    assert_eq!(stats.vector_count("industry"), 42);
    assert_eq!(stats.vector_count("past_issue"), 0);
    assert_eq!(stats.dimension, Some(4));
    assert!(industry.namespace_exists().await.unwrap());
    assert!(!store(&server, "past_issue").await.namespace_exists().await.unwrap());
}

#[tokio::test]
async fn delete_all_sends_delete_all_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/delete"))
        .and(body_json(json!({"deleteAll": true, "namespace": "industry"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    store(&server, "industry").await.delete_all().await.unwrap();
}

#[tokio::test]
async fn api_errors_keep_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_json(json!({"message": "too many requests"})),
        )
        .mount(&server)
        .await;

    let err = store(&server, "industry")
        .await
        .describe_index_stats()
        .await
        .unwrap_err();
    match err {
        PineconeStoreError::Api {
            status,
            message,
            retry_after_secs,
            ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(message, "too many requests");
            assert_eq!(retry_after_secs, Some(7));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
