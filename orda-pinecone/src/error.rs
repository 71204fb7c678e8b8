use orda_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PineconeStoreError {
    #[error("pinecone client misconfigured: {0}")]
    Config(String),
    #[error("could not reach pinecone: {0}")]
    Transport(String),
    #[error("pinecone returned HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        retry_after_secs: Option<u64>,
        namespace: Option<String>,
    },
    #[error("unexpected pinecone payload: {0}")]
    Malformed(String),
    #[error("record has no string field '{0}'")]
    MissingTextKey(String),
    #[error("vector has {got} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("embedder returned {got} vectors for {expected} records")]
    BatchMismatch { expected: usize, got: usize },
    #[error("index '{0}' is still initializing")]
    IndexNotReady(String),
}

impl PineconeStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

impl From<PineconeStoreError> for StoreError {
    fn from(err: PineconeStoreError) -> Self {
        match err {
            PineconeStoreError::DimensionMismatch { expected, got } => {
                StoreError::DimensionMismatch { expected, got }
            }
            PineconeStoreError::Api {
                status: 404,
                namespace: Some(ns),
                ..
            } => StoreError::NamespaceNotFound(ns),
            other => StoreError::Internal(Box::new(other)),
        }
    }
}
