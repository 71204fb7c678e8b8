use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use orda_core::{Embedding, EmbeddingError};
use secrecy::{ExposeSecret, SecretString};

use crate::EmbeddingProviderError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const TEXT_EMBEDDING_3_SMALL_DIMENSION: usize = 1536;

/// Inputs per request accepted by the endpoint.
const MAX_INPUTS_PER_REQUEST: usize = 2048;
/// Keeps a long article body under the model's 8191-token window. Korean
/// text runs close to one token per character.
const MAX_INPUT_CHARS: usize = 8000;

/// OpenAI embeddings for news text and knowledge index records.
#[derive(Clone)]
pub struct OpenAiEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedding {
    pub fn new(api_key: &SecretString, model: impl Into<String>, dimension: usize) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self::with_client(Client::with_config(config), model, dimension)
    }

    /// Uses a preconfigured client, e.g. one pointed at a proxy.
    pub fn with_client(client: Client<OpenAIConfig>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            client,
            model: model.into(),
            dimension,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One request; vectors come back in input order.
    async fn request(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let expected = inputs.len();
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.as_str())
            .input(EmbeddingInput::StringArray(inputs))
            .build()
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?;
        let mut data = self.client.embeddings().create(request).await?.data;

        if data.len() != expected {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "{} vectors for {expected} inputs",
                data.len()
            )));
        }
        data.sort_by_key(|item| item.index);
        data.into_iter()
            .map(|item| {
                if item.embedding.len() == self.dimension {
                    Ok(item.embedding)
                } else {
                    Err(EmbeddingProviderError::InvalidResponse(format!(
                        "vector of {} dimensions, expected {}",
                        item.embedding.len(),
                        self.dimension
                    )))
                }
            })
            .collect()
    }
}

fn prepare(text: &str) -> Result<String, EmbeddingProviderError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EmbeddingProviderError::EmptyInput);
    }
    Ok(match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    })
}

#[async_trait]
impl Embedding for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request(vec![prepare(text)?]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no vector returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let inputs = texts
            .iter()
            .map(|text| prepare(text))
            .collect::<Result<Vec<_>, _>>()?;

        let mut vectors = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(MAX_INPUTS_PER_REQUEST) {
            vectors.extend(self.request(chunk.to_vec()).await?);
        }
        tracing::debug!(model = %self.model, count = vectors.len(), "texts embedded");
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
