//! Chat model access: the OpenAI client and the [`ChatModel`] adapter that
//! lets a prompt feed a model inside a chain.

mod chat_model;
mod openai;
mod wire;

pub use chat_model::ChatModel;
pub use openai::{OpenAiClient, OPENAI_BASE_URL};
pub use orda_core::{LlmRequest, LlmResponse, Message, ResponseFormat, Role};

use orda_core::Runnable;

/// Anything that can answer a chat-completion request.
pub trait Llm: Runnable<LlmRequest, LlmResponse> + Send + Sync {}

impl<T> Llm for T where T: Runnable<LlmRequest, LlmResponse> + Send + Sync {}

/// Models used by the analysis services.
pub mod models {
    pub const GPT_4O: &str = "gpt-4o";
    pub const GPT_4O_MINI: &str = "gpt-4o-mini";
}
