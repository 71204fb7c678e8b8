use async_trait::async_trait;

use crate::{Document, StoreError};

/// A stored record and its similarity to the query, higher is closer.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
}

/// One namespace of the knowledge index.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upserts documents, embedding the ones that carry no vector.
    async fn add(&self, docs: Vec<Document>) -> Result<(), StoreError>;

    /// Nearest `top_k` records, best first.
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>, StoreError>;

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError>;
}
