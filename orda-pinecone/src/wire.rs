//! Request and response bodies of the Pinecone REST API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Serialize)]
pub struct Record {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct Upsert<'a> {
    pub vectors: &'a [Record],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query<'a> {
    pub vector: &'a [f32],
    pub top_k: usize,
    pub include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Match {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// Either explicit ids or the whole namespace.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delete<'a> {
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub ids: &'a [String],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub delete_all: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSummary {
    #[serde(default)]
    pub vector_count: u64,
}

/// Output of `describe_index_stats`. Namespaces without vectors are absent.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceSummary>,
    #[serde(default)]
    pub total_vector_count: u64,
}

impl IndexStats {
    pub fn vector_count(&self, namespace: &str) -> u64 {
        self.namespaces.get(namespace).map_or(0, |ns| ns.vector_count)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct IndexState {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IndexModel {
    pub name: String,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub status: IndexState,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexListing {
    #[serde(default)]
    pub indexes: Vec<IndexModel>,
}

#[derive(Debug, Serialize)]
pub struct CreateIndex<'a> {
    pub name: &'a str,
    pub dimension: usize,
    pub metric: &'a str,
    pub spec: ServerlessPlacement<'a>,
}

#[derive(Debug, Serialize)]
pub struct ServerlessPlacement<'a> {
    pub serverless: Region<'a>,
}

#[derive(Debug, Serialize)]
pub struct Region<'a> {
    pub cloud: &'a str,
    pub region: &'a str,
}
