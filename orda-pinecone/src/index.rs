use std::time::Duration;

use secrecy::SecretString;

use crate::transport::Transport;
use crate::wire::{CreateIndex, IndexListing, IndexModel, Region, ServerlessPlacement};
use crate::PineconeStoreError;

pub const PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";

/// Serverless index layout used when the knowledge index is created.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSpec {
    pub dimension: usize,
    pub metric: String,
    pub cloud: String,
    pub region: String,
}

impl Default for IndexSpec {
    fn default() -> Self {
        Self {
            dimension: 1536,
            metric: "cosine".into(),
            cloud: "aws".into(),
            region: "us-east-1".into(),
        }
    }
}

/// Control-plane client: finds, creates and waits on indexes.
#[derive(Clone, Debug)]
pub struct PineconeIndexAdmin {
    transport: Transport,
    poll_every: Duration,
    max_polls: usize,
}

impl PineconeIndexAdmin {
    pub fn new(
        control_url: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, PineconeStoreError> {
        Ok(Self {
            transport: Transport::connect(control_url, api_key)?,
            poll_every: Duration::from_secs(2),
            max_polls: 60,
        })
    }

    pub fn with_polling(self, poll_every: Duration, max_polls: usize) -> Self {
        Self {
            poll_every,
            max_polls,
            ..self
        }
    }

    pub async fn list_indexes(&self) -> Result<Vec<IndexModel>, PineconeStoreError> {
        let listing: IndexListing = self.transport.get("/indexes").await?;
        Ok(listing.indexes)
    }

    pub async fn describe_index(&self, name: &str) -> Result<IndexModel, PineconeStoreError> {
        self.transport.get(&format!("/indexes/{name}")).await
    }

    pub async fn create_index(
        &self,
        name: &str,
        spec: &IndexSpec,
    ) -> Result<IndexModel, PineconeStoreError> {
        tracing::info!(index = name, dimension = spec.dimension, metric = %spec.metric, "creating index");
        let body = CreateIndex {
            name,
            dimension: spec.dimension,
            metric: &spec.metric,
            spec: ServerlessPlacement {
                serverless: Region {
                    cloud: &spec.cloud,
                    region: &spec.region,
                },
            },
        };
        self.transport.post("/indexes", &body, None).await
    }

    /// Makes sure `name` exists and is ready, creating it from `spec` when
    /// missing. Returns the data-plane URL.
    pub async fn ensure_index(
        &self,
        name: &str,
        spec: &IndexSpec,
    ) -> Result<String, PineconeStoreError> {
        let indexes = self.list_indexes().await?;
        if indexes.iter().any(|index| index.name == name) {
            tracing::info!(index = name, "index exists");
        } else {
            self.create_index(name, spec).await?;
        }
        self.wait_until_ready(name).await
    }

    pub async fn wait_until_ready(&self, name: &str) -> Result<String, PineconeStoreError> {
        for poll in 1..=self.max_polls.max(1) {
            let model = self.describe_index(name).await?;
            match model.host {
                Some(host) if model.status.ready => return Ok(data_plane_url(&host)),
                _ => tracing::debug!(
                    index = name,
                    poll,
                    state = model.status.state.as_deref().unwrap_or("unknown"),
                    "index not ready"
                ),
            }
            tokio::time::sleep(self.poll_every).await;
        }
        Err(PineconeStoreError::IndexNotReady(name.to_string()))
    }

    /// Data-plane URL of an existing index, ready or not.
    pub async fn index_host(&self, name: &str) -> Result<String, PineconeStoreError> {
        self.describe_index(name)
            .await?
            .host
            .map(|host| data_plane_url(&host))
            .ok_or_else(|| PineconeStoreError::Malformed(format!("index '{name}' reports no host")))
    }
}

/// Pinecone reports bare hostnames.
fn data_plane_url(host: &str) -> String {
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
