//! Building blocks shared by the Orda services.
//!
//! Everything that talks to a model is a [`Runnable`], so prompt, model and
//! parser steps compose with [`RunnableExt::then`] and tests can swap any
//! step for a fake.

mod chain;
mod document;
mod embedding;
mod error;
mod llm;
mod output_parsers;
mod retry;
mod runnable;
mod scoring;
mod vector_store;

pub use chain::{Chain, RunnableExt};
pub use document::{Document, Value};
pub use embedding::Embedding;
pub use error::{EmbeddingError, OrdaError, StoreError};
pub use llm::{LlmRequest, LlmResponse, Message, ResponseFormat, Role};
pub use output_parsers::{JsonOutputParser, StrOutputParser};
pub use retry::{is_retryable, Retrying};
pub use runnable::Runnable;
pub use scoring::{mean, round_to};
pub use vector_store::{SearchResult, VectorStore};
