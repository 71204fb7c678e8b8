use std::time::Duration;

use orda_pinecone::{IndexSpec, PineconeIndexAdmin, PineconeStoreError};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin(server: &MockServer) -> PineconeIndexAdmin {
    PineconeIndexAdmin::new(server.uri(), SecretString::new("key".to_string()))
        .unwrap()
        .with_polling(Duration::from_millis(1), 3)
}

#[tokio::test]
async fn ensure_index_creates_missing_serverless_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"indexes": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(body_json(json!({
            "name": "ordaproject",
            "dimension": 1536,
            "metric": "cosine",
            "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "ordaproject",
            "dimension": 1536,
            "status": {"ready": false, "state": "Initializing"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/ordaproject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ordaproject",
            "host": "ordaproject-abc.svc.pinecone.io",
            "status": {"ready": true, "state": "Ready"}
        })))
        .mount(&server)
        .await;

    let host = admin(&server)
        .ensure_index("ordaproject", &IndexSpec::default())
        .await
        .unwrap();
    assert_eq!(host, "https://ordaproject-abc.svc.pinecone.io");
}

#[tokio::test]
async fn ensure_index_skips_creation_for_existing_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "indexes": [{"name": "ordaproject"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/ordaproject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ordaproject",
            "host": "https://ordaproject.example",
            "status": {"ready": true}
        })))
        .mount(&server)
        .await;

    let host = admin(&server)
        .ensure_index("ordaproject", &IndexSpec::default())
        .await
        .unwrap();
    assert_eq!(host, "https://ordaproject.example");
}

#[tokio::test]
async fn wait_until_ready_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "slow",
            "status": {"ready": false}
        })))
        .mount(&server)
        .await;

    let err = admin(&server).wait_until_ready("slow").await.unwrap_err();
    assert!(matches!(err, PineconeStoreError::IndexNotReady(name) if name == "slow"));
}

#[tokio::test]
async fn missing_index_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "NOT_FOUND", "message": "Resource ghost not found"}
        })))
        .mount(&server)
        .await;

    let err = admin(&server).index_host("ghost").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Resource ghost not found"));
}
