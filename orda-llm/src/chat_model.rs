use std::sync::Arc;

use orda_core::{LlmRequest, LlmResponse, Message, OrdaError, Runnable};

use crate::Llm;

/// Binds a model name and sampling settings to a shared client so that a
/// prompt can be piped straight into it.
#[derive(Clone)]
pub struct ChatModel {
    llm: Arc<dyn Llm>,
    model: String,
    temperature: Option<f32>,
    json: bool,
}

impl ChatModel {
    pub fn new(llm: Arc<dyn Llm>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: None,
            json: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Requests `response_format = json_object`.
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn request(&self, messages: Vec<Message>) -> LlmRequest {
        let mut request = LlmRequest::new(self.model.clone(), messages);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if self.json {
            request = request.json();
        }
        request
    }
}

#[async_trait::async_trait]
impl Runnable<Vec<Message>, LlmResponse> for ChatModel {
    async fn invoke(&self, input: Vec<Message>) -> Result<LlmResponse, OrdaError> {
        self.llm.invoke(self.request(input)).await
    }
}
