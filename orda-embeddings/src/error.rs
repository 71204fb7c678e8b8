use async_openai::error::OpenAIError;
use orda_core::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("embeddings request failed: {0}")]
    Request(String),
    #[error("embeddings quota exhausted: {0}")]
    RateLimited(String),
    #[error("unexpected embeddings payload: {0}")]
    InvalidResponse(String),
    #[error("cannot embed empty text")]
    EmptyInput,
}

impl From<EmbeddingProviderError> for EmbeddingError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::RateLimited(_) => EmbeddingError::RateLimited { retry_after: None },
            EmbeddingProviderError::InvalidResponse(detail) => EmbeddingError::InvalidResponse(detail),
            other => EmbeddingError::Provider(other.to_string()),
        }
    }
}

impl From<OpenAIError> for EmbeddingProviderError {
    fn from(error: OpenAIError) -> Self {
        match error {
            // OpenAI tags quota and rate-limit rejections with type "requests"
            // or "insufficient_quota".
            OpenAIError::ApiError(api)
                if matches!(api.r#type.as_deref(), Some("requests" | "insufficient_quota")) =>
            {
                EmbeddingProviderError::RateLimited(api.message)
            }
            OpenAIError::JSONDeserialize(err) => EmbeddingProviderError::InvalidResponse(err.to_string()),
            other => EmbeddingProviderError::Request(other.to_string()),
        }
    }
}
