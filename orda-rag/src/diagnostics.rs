use std::collections::BTreeMap;

use orda_core::{Value, VectorStore};
use orda_pinecone::PineconeVectorStore;
use serde::Serialize;

use crate::SearchMode;

const SAMPLE_SIZE: usize = 3;
const PREVIEW_CHARS: usize = 50;
/// Metadata keys a text-bearing record might use.
const TEXT_KEYS: [&str; 6] = ["text", "page_content", "content", "name", "description", "issue_name"];

#[derive(Clone, Debug, Serialize)]
pub struct SampleRecord {
    pub id: String,
    pub score: f32,
    pub metadata_keys: Vec<String>,
    pub preview: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NamespaceReport {
    pub namespace: String,
    pub vector_count: Option<u64>,
    pub samples: Vec<SampleRecord>,
    pub text_keys_found: Vec<String>,
    pub error: Option<String>,
}

fn preview(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        text
    }
}

/// Samples a namespace with a zero vector to show what its records hold.
pub async fn inspect_namespace(
    store: &PineconeVectorStore,
    mode: SearchMode,
    dimension: usize,
) -> NamespaceReport {
    let mut report = NamespaceReport {
        namespace: mode.namespace().to_string(),
        vector_count: None,
        samples: Vec::new(),
        text_keys_found: Vec::new(),
        error: None,
    };

    match store.describe_index_stats().await {
        Ok(stats) => {
            report.vector_count = Some(stats.vector_count(mode.namespace()));
        }
        Err(err) => report.error = Some(err.to_string()),
    }

    let zero = vec![0.0f32; dimension];
    match store.search(&zero, SAMPLE_SIZE).await {
        Ok(hits) => {
            for hit in hits {
                let doc = hit.document;
                let mut metadata_keys: Vec<String> = doc.metadata.keys().cloned().collect();
                if !doc.content.is_empty() {
                    metadata_keys.push(store.text_key().to_string());
                }
                metadata_keys.sort();
                for key in TEXT_KEYS {
                    if metadata_keys.iter().any(|k| k == key)
                        && !report.text_keys_found.iter().any(|k| k == key)
                    {
                        report.text_keys_found.push(key.to_string());
                    }
                }
                report.samples.push(SampleRecord {
                    id: doc.id,
                    score: hit.score,
                    metadata_keys,
                    preview: doc
                        .metadata
                        .iter()
                        .map(|(k, v)| (k.clone(), preview(v)))
                        .collect(),
                });
            }
        }
        Err(err) => {
            tracing::warn!(namespace = %mode, error = %err, "namespace sample search failed");
            report.error = Some(err.to_string());
        }
    }
    report
}
