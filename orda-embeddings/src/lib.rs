//! OpenAI embeddings behind the [`orda_core::Embedding`] trait.

mod error;
mod openai;

pub use error::EmbeddingProviderError;
pub use openai::{OpenAiEmbedding, DEFAULT_EMBEDDING_MODEL, TEXT_EMBEDDING_3_SMALL_DIMENSION};
