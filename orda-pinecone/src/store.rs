use std::sync::Arc;

use orda_core::{Document, Embedding, SearchResult, StoreError, VectorStore};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::builder::NamespaceStoreBuilder;
use crate::record::{document_from, metadata_for};
use crate::transport::Transport;
use crate::wire::{Delete, IndexStats, Query, QueryResult, Record, Upsert};
use crate::PineconeStoreError;

/// One namespace of a Pinecone index.
pub struct PineconeVectorStore {
    pub(crate) transport: Transport,
    pub(crate) embedder: Arc<dyn Embedding>,
    pub(crate) namespace: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) text_key: String,
    pub(crate) require_text: bool,
    pub(crate) max_batch_size: usize,
}

impl PineconeVectorStore {
    pub fn builder(embedder: Arc<dyn Embedding>) -> NamespaceStoreBuilder {
        NamespaceStoreBuilder::new(embedder)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Metadata field holding each record's text.
    pub fn text_key(&self) -> &str {
        &self.text_key
    }

    /// Stats for the whole index, not only this namespace.
    pub async fn describe_index_stats(&self) -> Result<IndexStats, PineconeStoreError> {
        self.transport
            .post("/describe_index_stats", &serde_json::Map::new(), None)
            .await
    }

    /// True when the namespace holds at least one vector.
    pub async fn namespace_exists(&self) -> Result<bool, PineconeStoreError> {
        let stats = self.describe_index_stats().await?;
        Ok(stats
            .namespaces
            .contains_key(self.namespace.as_deref().unwrap_or_default()))
    }

    pub(crate) async fn warn_on_dimension_mismatch(&self) {
        let expected = self.embedder.dimension();
        match self.describe_index_stats().await {
            Ok(IndexStats {
                dimension: Some(actual),
                ..
            }) if actual != expected => tracing::warn!(
                index = ?self.index_name,
                index_dimension = actual,
                embedder_dimension = expected,
                "index and embedder dimensions differ"
            ),
            Ok(_) => {}
            Err(err) => tracing::warn!(index = ?self.index_name, error = %err, "dimension check skipped"),
        }
    }

    /// Embeds documents that lack a vector and upserts everything in
    /// batches of `max_batch_size`. Blank ids get a random UUID.
    pub async fn add_documents(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        if docs.is_empty() {
            return Ok(());
        }
        let span = tracing::info_span!("pinecone_upsert", namespace = ?self.namespace, records = docs.len());
        let records = self.records(docs).instrument(span.clone()).await?;

        let batches = records.len().div_ceil(self.max_batch_size);
        for (n, batch) in records.chunks(self.max_batch_size).enumerate() {
            let body = Upsert {
                vectors: batch,
                namespace: self.namespace.as_deref(),
            };
            let _: Value = self
                .transport
                .post("/vectors/upsert", &body, self.namespace.as_deref())
                .instrument(span.clone())
                .await?;
            tracing::debug!(parent: &span, batch = n + 1, of = batches, size = batch.len(), "batch upserted");
        }
        Ok(())
    }

    async fn records(&self, docs: Vec<Document>) -> Result<Vec<Record>, StoreError> {
        let pending: Vec<String> = docs
            .iter()
            .filter(|d| d.embedding.is_none())
            .map(|d| d.content.clone())
            .collect();
        let embedded = if pending.is_empty() {
            Vec::new()
        } else {
            self.embedder
                .embed_batch(&pending)
                .await
                .map_err(|err| StoreError::Internal(Box::new(err)))?
        };
        if embedded.len() != pending.len() {
            return Err(PineconeStoreError::BatchMismatch {
                expected: pending.len(),
                got: embedded.len(),
            }
            .into());
        }

        let dimension = self.embedder.dimension();
        let mut embedded = embedded.into_iter();
        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            let values = match doc.embedding.clone() {
                Some(values) => values,
                None => embedded.next().ok_or(PineconeStoreError::BatchMismatch {
                    expected: pending.len(),
                    got: records.len(),
                })?,
            };
            if values.len() != dimension {
                return Err(StoreError::DimensionMismatch {
                    expected: dimension,
                    got: values.len(),
                });
            }
            let id = if doc.id.trim().is_empty() {
                Uuid::new_v4().to_string()
            } else {
                doc.id.clone()
            };
            records.push(Record {
                id,
                values,
                metadata: metadata_for(&doc, &self.text_key),
            });
        }
        Ok(records)
    }

    /// Drops every vector in the namespace.
    pub async fn delete_all(&self) -> Result<(), StoreError> {
        self.delete_request(&[], true).await
    }

    async fn delete_request(&self, ids: &[String], everything: bool) -> Result<(), StoreError> {
        let body = Delete {
            ids,
            delete_all: everything,
            namespace: self.namespace.as_deref(),
        };
        let _: Value = self
            .transport
            .post("/vectors/delete", &body, self.namespace.as_deref())
            .instrument(tracing::info_span!(
                "pinecone_delete",
                namespace = ?self.namespace,
                ids = ids.len(),
                everything
            ))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl VectorStore for PineconeVectorStore {
    async fn add(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        self.add_documents(docs).await
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>, StoreError> {
        let body = Query {
            vector: query,
            top_k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };
        let result: QueryResult = self
            .transport
            .post("/query", &body, self.namespace.as_deref())
            .instrument(tracing::info_span!("pinecone_query", namespace = ?self.namespace, top_k))
            .await?;

        result
            .matches
            .into_iter()
            .map(|hit| {
                let (document, score) = document_from(hit, &self.text_key, self.require_text)?;
                Ok::<_, StoreError>(SearchResult { document, score })
            })
            .collect()
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.delete_request(ids, false).await
    }
}
