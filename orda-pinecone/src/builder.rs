use std::sync::Arc;

use orda_core::Embedding;
use secrecy::SecretString;

use crate::store::PineconeVectorStore;
use crate::transport::Transport;
use crate::PineconeStoreError;

pub const DEFAULT_TEXT_KEY: &str = "text";
pub const DEFAULT_UPSERT_BATCH: usize = 100;

/// Configures a [`PineconeVectorStore`]. `base_url` and `api_key` are
/// required.
pub struct NamespaceStoreBuilder {
    embedder: Arc<dyn Embedding>,
    base_url: Option<String>,
    api_key: Option<SecretString>,
    namespace: Option<String>,
    index_name: Option<String>,
    text_key: String,
    require_text: bool,
    max_batch_size: usize,
    check_dimension: bool,
}

impl NamespaceStoreBuilder {
    pub(crate) fn new(embedder: Arc<dyn Embedding>) -> Self {
        Self {
            embedder,
            base_url: None,
            api_key: None,
            namespace: None,
            index_name: None,
            text_key: DEFAULT_TEXT_KEY.to_string(),
            require_text: true,
            max_batch_size: DEFAULT_UPSERT_BATCH,
            check_dimension: false,
        }
    }

    /// Data-plane host of the index.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Only used in log fields.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn text_key(mut self, key: impl Into<String>) -> Self {
        self.text_key = key.into();
        self
    }

    pub fn require_text(mut self, required: bool) -> Self {
        self.require_text = required;
        self
    }

    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Compare the index dimension with the embedder's on build and warn
    /// when they differ.
    pub fn check_dimension(mut self, enabled: bool) -> Self {
        self.check_dimension = enabled;
        self
    }

    pub async fn build(self) -> Result<PineconeVectorStore, PineconeStoreError> {
        let Some(base_url) = self.base_url else {
            return Err(PineconeStoreError::Config("missing base_url".to_string()));
        };
        let Some(api_key) = self.api_key else {
            return Err(PineconeStoreError::Config("missing api_key".to_string()));
        };
        if self.max_batch_size == 0 {
            return Err(PineconeStoreError::Config(
                "max_batch_size must be positive".to_string(),
            ));
        }

        let store = PineconeVectorStore {
            transport: Transport::connect(base_url, api_key)?,
            embedder: self.embedder,
            namespace: self.namespace,
            index_name: self.index_name,
            text_key: self.text_key,
            require_text: self.require_text,
            max_batch_size: self.max_batch_size,
        };
        if self.check_dimension {
            store.warn_on_dimension_mismatch().await;
        }
        Ok(store)
    }
}
