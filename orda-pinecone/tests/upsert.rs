use std::sync::Arc;

use orda_core::{Document, Embedding, EmbeddingError, StoreError, VectorStore};
use orda_pinecone::PineconeVectorStore;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Three-dimensional vectors whose first value is the text length.
struct LengthEmbedding;

#[async_trait::async_trait]
impl Embedding for LengthEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![text.chars().count() as f32, 0.0, 1.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        3
    }
}

async fn industry_store(server: &MockServer, batch: usize) -> PineconeVectorStore {
    PineconeVectorStore::builder(Arc::new(LengthEmbedding))
        .base_url(server.uri())
        .api_key(SecretString::new("pc-key".to_string()))
        .namespace("industry")
        .max_batch_size(batch)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn industry_rows_are_upserted_with_text_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(header("Api-Key", "pc-key"))
        .and(header("X-Pinecone-API-Version", "2024-07"))
        .and(body_partial_json(json!({
            "namespace": "industry",
            "vectors": [{
                "id": "industry-0",
                "values": [3.0, 0.0, 1.0],
                "metadata": {"name": "반도체", "text": "반도체"}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let row = Document::new("industry-0", "반도체").with_metadata("name", "반도체");
    industry_store(&server, 100)
        .await
        .add(vec![row])
        .await
        .unwrap();
}

#[tokio::test]
async fn large_uploads_are_split_into_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    let rows = (0..5)
        .map(|i| Document::new(format!("past-{i}"), format!("이슈 {i}")))
        .collect();
    industry_store(&server, 2).await.add_documents(rows).await.unwrap();
}

#[tokio::test]
async fn stored_vectors_must_match_the_embedder() {
    let server = MockServer::start().await;
    let mut row = Document::new("industry-9", "은행");
    row.embedding = Some(vec![0.5]);

    let err = industry_store(&server, 10)
        .await
        .add_documents(vec![row])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DimensionMismatch { expected: 3, got: 1 }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn nothing_is_sent_for_empty_input() {
    let server = MockServer::start().await;
    let store = industry_store(&server, 10).await;
    store.add_documents(Vec::new()).await.unwrap();
    store.delete(&[]).await.unwrap();
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn ids_are_deleted_within_the_namespace() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/delete"))
        .and(body_json(json!({"ids": ["industry-1", "industry-2"], "namespace": "industry"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    industry_store(&server, 10)
        .await
        .delete(&["industry-1".to_string(), "industry-2".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn builder_rejects_incomplete_configuration() {
    let missing_key = PineconeVectorStore::builder(Arc::new(LengthEmbedding))
        .base_url("https://idx.example")
        .build()
        .await;
    assert!(missing_key.is_err());

    let zero_batch = PineconeVectorStore::builder(Arc::new(LengthEmbedding))
        .base_url("https://idx.example")
        .api_key(SecretString::new("k".to_string()))
        .max_batch_size(0)
        .build()
        .await;
    assert!(zero_batch.is_err());
}
