use std::sync::Arc;
use std::time::Duration;

use orda_core::{Embedding, EmbeddingError};
use orda_pinecone::PineconeIndexAdmin;
use orda_rag::diagnostics::inspect_namespace;
use orda_rag::{
    open_namespace_store, IndexPopulator, IndustryRecord, KnowledgeBase, PastNewsRecord,
    ReferenceData, SearchMode,
};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TinyEmbedding;

#[async_trait::async_trait]
impl Embedding for TinyEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.5; 4])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![0.5; 4]).collect())
    }

    fn dimension(&self) -> usize {
        4
    }
}

fn key() -> SecretString {
    SecretString::new("pc-key".to_string())
}

fn reference() -> ReferenceData {
    ReferenceData {
        industries: vec![IndustryRecord {
            row: 0,
            krx_name: "반도체".to_string(),
            description: "메모리".to_string(),
        }],
        past_news: vec![PastNewsRecord {
            id: "P1".to_string(),
            title: "미중 무역분쟁".to_string(),
            summary: "관세".to_string(),
            content: String::new(),
            start_date: "2018-03-01".to_string(),
            end_date: "2019-12-31".to_string(),
            evidence_source: String::new(),
            related_industries: "무역".to_string(),
            industry_tags: "반도체".to_string(),
            source: "과거 이슈 DB".to_string(),
        }],
    }
}

#[tokio::test]
async fn populate_creates_index_clears_and_uploads() {
    let control = MockServer::start().await;
    let data = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"indexes": []})))
        .mount(&control)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(body_partial_json(json!({"name": "ordaproject", "dimension": 4})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "ordaproject"})))
        .expect(1)
        .mount(&control)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/ordaproject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ordaproject",
            "host": data.uri(),
            "status": {"ready": true}
        })))
        .mount(&control)
        .await;

    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dimension": 4,
            "namespaces": {"industry": {"vectorCount": 1}},
            "totalVectorCount": 1
        })))
        .mount(&data)
        .await;
    Mock::given(method("POST"))
        .and(path("/vectors/delete"))
        .and(body_partial_json(json!({"deleteAll": true, "namespace": "industry"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&data)
        .await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(body_partial_json(json!({
            "namespace": "industry",
            "vectors": [{"id": "industry-0", "metadata": {"name": "반도체"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&data)
        .await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(body_partial_json(json!({
            "namespace": "past_issue",
            "vectors": [{"id": "P1", "metadata": {"start_date": "2018-03-01"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&data)
        .await;

    let admin = PineconeIndexAdmin::new(control.uri(), key())
        .unwrap()
        .with_polling(Duration::from_millis(1), 2);
    let populator = IndexPopulator::new(admin, key(), Arc::new(TinyEmbedding), "ordaproject");
    let data_set = reference();
    let report = populator.populate(&KnowledgeBase::new(&data_set)).await.unwrap();

    assert_eq!(report.industries, 1);
    assert_eq!(report.past_issues, 1);
    assert_eq!(report.host, data.uri());
    assert_eq!(report.stats.total_vector_count, 1);
}

#[tokio::test]
async fn diagnostics_sample_namespace_records() {
    let data = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "namespaces": {"past_issue": {"vectorCount": 42}}
        })))
        .mount(&data)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({"topK": 3, "includeMetadata": true, "namespace": "past_issue"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{
                "id": "P1",
                "score": 0.0,
                "metadata": {
                    "name": "미중 무역분쟁",
                    "description": "가나다라마바사아자차".repeat(6)
                }
            }]
        })))
        .mount(&data)
        .await;

    let store = open_namespace_store(
        &data.uri(),
        key(),
        Arc::new(TinyEmbedding),
        "ordaproject",
        SearchMode::PastIssue,
    )
    .await
    .unwrap();
    let report = inspect_namespace(&store, SearchMode::PastIssue, 4).await;

    assert_eq!(report.vector_count, Some(42));
    assert!(report.error.is_none());
    assert_eq!(report.samples.len(), 1);
    assert_eq!(report.samples[0].id, "P1");
    assert_eq!(report.samples[0].metadata_keys, vec!["description", "name"]);
    assert!(report.samples[0].preview["description"].ends_with("..."));
    assert_eq!(report.text_keys_found, vec!["name", "description"]);
}
