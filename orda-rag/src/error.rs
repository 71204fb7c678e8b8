use orda_core::{EmbeddingError, OrdaError, StoreError};
use orda_pinecone::PineconeStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("vector store failed: {0}")]
    Store(#[from] StoreError),
    #[error("pinecone request failed: {0}")]
    Pinecone(#[from] PineconeStoreError),
    #[error("LLM call failed: {0}")]
    Llm(#[from] OrdaError),
    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("missing column '{column}' in {path}")]
    MissingColumn { path: String, column: String },
}
