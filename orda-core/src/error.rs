use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

/// Failure of a model call or of any step composed around one.
#[derive(Debug, Error)]
pub enum OrdaError {
    #[error("model call failed: {0}")]
    LlmProvider(String),
    #[error("model output could not be parsed ({reason}): {output}")]
    ParseFailed { output: String, reason: String },
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("gave up after {max} attempts")]
    MaxRetriesExceeded { max: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

impl From<EmbeddingError> for OrdaError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Timeout(after) => OrdaError::Timeout(after),
            other => OrdaError::LlmProvider(other.to_string()),
        }
    }
}

impl From<StoreError> for OrdaError {
    fn from(err: StoreError) -> Self {
        OrdaError::Custom(err.to_string())
    }
}

/// Failure to turn text into a vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("unexpected embedding response: {0}")]
    InvalidResponse(String),
    #[error("embedding rate limited{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },
    #[error("embedding timed out after {0:?}")]
    Timeout(Duration),
    #[error("embedding provider error: {0}")]
    Provider(String),
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|after| format!(", retry after {after:?}"))
        .unwrap_or_default()
}

/// Failure of a vector index operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vector has {got} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid record id: {0}")]
    InvalidId(String),
    #[error("namespace {0} does not exist")]
    NamespaceNotFound(String),
    #[error("vector index error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}
