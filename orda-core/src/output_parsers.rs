use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{LlmResponse, OrdaError, Runnable};

/// The model's text, trimmed.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrOutputParser;

#[async_trait]
impl Runnable<LlmResponse, String> for StrOutputParser {
    async fn invoke(&self, input: LlmResponse) -> Result<String, OrdaError> {
        Ok(input.content.trim().to_string())
    }
}

/// Deserializes model output into `T`.
///
/// Markdown code fences are removed first. If the text still does not
/// parse, the outermost `{...}` span is tried, since models sometimes wrap
/// the object in a sentence.
#[derive(Clone, Copy, Debug)]
pub struct JsonOutputParser<T = Value> {
    _target: PhantomData<fn() -> T>,
}

impl<T> Default for JsonOutputParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JsonOutputParser<T> {
    pub fn new() -> Self {
        Self {
            _target: PhantomData,
        }
    }
}

fn without_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`) up to the first newline.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

impl<T: DeserializeOwned> JsonOutputParser<T> {
    pub fn parse(&self, text: &str) -> Result<T, OrdaError> {
        let cleaned = without_fences(text);
        match serde_json::from_str(cleaned) {
            Ok(value) => Ok(value),
            Err(first) => object_span(cleaned)
                .filter(|span| span.len() < cleaned.len())
                .and_then(|span| serde_json::from_str(span).ok())
                .ok_or_else(|| OrdaError::ParseFailed {
                    output: cleaned.to_string(),
                    reason: first.to_string(),
                }),
        }
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + 'static> Runnable<String, T> for JsonOutputParser<T> {
    async fn invoke(&self, input: String) -> Result<T, OrdaError> {
        self.parse(&input)
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + 'static> Runnable<LlmResponse, T> for JsonOutputParser<T> {
    async fn invoke(&self, input: LlmResponse) -> Result<T, OrdaError> {
        self.parse(&input.content)
    }
}
