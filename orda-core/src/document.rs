use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type Value = serde_json::Value;

/// A record of the knowledge index: an industry or a past issue.
///
/// `content` is the text that was embedded; `metadata` holds the fields
/// shown back to the user (`name`, `description`, dates).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, Value>,
    /// Precomputed vector. `None` means the store embeds `content`.
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            embedding: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// A metadata entry as text. Numbers and booleans are rendered, null
    /// counts as missing.
    pub fn metadata_str(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}
