use std::time::Duration;

use orda_core::{LlmRequest, LlmResponse, OrdaError, Runnable};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::models::GPT_4O_MINI;
use crate::wire::{Completion, CompletionBody, ErrorEnvelope};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completions client for OpenAI or any server speaking its API.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: Url,
    api_key: SecretString,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(api_key: SecretString) -> Result<Self, OrdaError> {
        Self::with_base_url(api_key, OPENAI_BASE_URL)
    }

    /// `base_url` is the server root; `v1/chat/completions` is appended.
    pub fn with_base_url(api_key: SecretString, base_url: &str) -> Result<Self, OrdaError> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(OrdaError::InvalidConfig("empty OpenAI api key".to_string()));
        }
        let root = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&root)
            .and_then(|root| root.join("v1/chat/completions"))
            .map_err(|err| OrdaError::InvalidConfig(format!("bad OpenAI url '{base_url}': {err}")))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| OrdaError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            api_key,
            model: GPT_4O_MINI.to_string(),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Model used when a request leaves its model empty.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn failure(&self, status: StatusCode, body: &str) -> OrdaError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());
        let detail = format!("{status}: {message}");
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                OrdaError::InvalidConfig(detail)
            }
            _ => OrdaError::LlmProvider(detail),
        }
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OpenAiClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, OrdaError> {
        let body = CompletionBody::from_request(input, &self.model);
        tracing::debug!(model = %body.model, messages = body.messages.len(), "chat completion");

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    OrdaError::Timeout(self.timeout)
                } else {
                    OrdaError::LlmProvider(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.failure(status, &text));
        }

        let completion: Completion = response
            .json()
            .await
            .map_err(|err| OrdaError::LlmProvider(format!("unreadable completion: {err}")))?;
        completion
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|content| LlmResponse { content })
            .ok_or_else(|| OrdaError::LlmProvider("completion had no content".to_string()))
    }
}
