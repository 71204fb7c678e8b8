//! Chat-completions payloads.

use orda_core::{LlmRequest, Message, ResponseFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct CompletionBody {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<FormatTag>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FormatTag {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl CompletionBody {
    /// An empty model name in the request means `fallback_model`.
    pub fn from_request(request: LlmRequest, fallback_model: &str) -> Self {
        let model = if request.model.trim().is_empty() {
            fallback_model.to_string()
        } else {
            request.model
        };
        let response_format = match request.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(FormatTag {
                kind: "json_object",
            }),
        };
        Self {
            model,
            messages: request.messages,
            temperature: request.temperature,
            response_format,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Completion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
