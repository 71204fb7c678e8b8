use std::sync::Arc;

use orda_core::{Document, Embedding};
use orda_pinecone::{IndexSpec, IndexStats, PineconeIndexAdmin, PineconeVectorStore};
use secrecy::SecretString;

use crate::{RagError, ReferenceData, SearchMode};

pub const UPSERT_BATCH_SIZE: usize = 100;

/// Opens the data-plane store for one namespace of the knowledge index.
///
/// Records written by older loaders carry metadata only, so text is not
/// required on read.
pub async fn open_namespace_store(
    host: &str,
    api_key: SecretString,
    embedder: Arc<dyn Embedding>,
    index_name: &str,
    mode: SearchMode,
) -> Result<PineconeVectorStore, RagError> {
    Ok(PineconeVectorStore::builder(embedder)
        .base_url(host)
        .api_key(api_key)
        .namespace(mode.namespace())
        .index_name(index_name)
        .require_text(false)
        .max_batch_size(UPSERT_BATCH_SIZE)
        .build()
        .await?)
}

/// Turns reference rows into the documents stored in each namespace.
pub struct KnowledgeBase<'a> {
    data: &'a ReferenceData,
}

impl<'a> KnowledgeBase<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self { data }
    }

    pub fn industry_documents(&self) -> Vec<Document> {
        self.data
            .industries
            .iter()
            .map(|r| {
                Document::new(
                    format!("industry-{}", r.row),
                    format!("KRX 업종명: {}\n상세내용: {}", r.krx_name, r.description),
                )
                .with_metadata("name", r.krx_name.clone())
                .with_metadata("description", r.description.clone())
            })
            .collect()
    }

    pub fn past_issue_documents(&self) -> Vec<Document> {
        self.data
            .past_news
            .iter()
            .map(|r| {
                Document::new(
                    r.id.clone(),
                    format!("Issue_name: {}\nContents: {}", r.title, r.summary),
                )
                .with_metadata("name", r.title.clone())
                .with_metadata("description", r.summary.clone())
                .with_metadata("related_industries", r.industry_tags.clone())
                .with_metadata("start_date", r.start_date.clone())
                .with_metadata("end_date", r.end_date.clone())
            })
            .collect()
    }

    pub fn documents(&self, mode: SearchMode) -> Vec<Document> {
        match mode {
            SearchMode::Industry => self.industry_documents(),
            SearchMode::PastIssue => self.past_issue_documents(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PopulateReport {
    pub host: String,
    pub industries: usize,
    pub past_issues: usize,
    pub stats: IndexStats,
}

/// Rebuilds both namespaces of the knowledge index from reference data.
pub struct IndexPopulator {
    admin: PineconeIndexAdmin,
    api_key: SecretString,
    embedder: Arc<dyn Embedding>,
    index_name: String,
    spec: IndexSpec,
}

impl IndexPopulator {
    pub fn new(
        admin: PineconeIndexAdmin,
        api_key: SecretString,
        embedder: Arc<dyn Embedding>,
        index_name: impl Into<String>,
    ) -> Self {
        Self {
            spec: IndexSpec {
                dimension: embedder.dimension(),
                ..IndexSpec::default()
            },
            admin,
            api_key,
            embedder,
            index_name: index_name.into(),
        }
    }

    pub async fn populate(&self, kb: &KnowledgeBase<'_>) -> Result<PopulateReport, RagError> {
        let host = self.admin.ensure_index(&self.index_name, &self.spec).await?;
        tracing::info!(index = %self.index_name, %host, "knowledge index ready");

        let mut stores = Vec::with_capacity(SearchMode::ALL.len());
        for mode in SearchMode::ALL {
            let store = open_namespace_store(
                &host,
                self.api_key.clone(),
                self.embedder.clone(),
                &self.index_name,
                mode,
            )
            .await?;
            clear_namespace(&store, mode).await;
            stores.push((mode, store));
        }

        let mut counts = [0usize; 2];
        for (slot, (mode, store)) in stores.iter().enumerate() {
            let docs = kb.documents(*mode);
            counts[slot] = docs.len();
            tracing::info!(namespace = %mode, records = docs.len(), "uploading namespace");
            store.add_documents(docs).await?;
        }

        let stats = match stores.first() {
            Some((_, store)) => store.describe_index_stats().await?,
            None => IndexStats::default(),
        };
        tracing::info!(total_vectors = stats.total_vector_count, "knowledge index populated");

        Ok(PopulateReport {
            host,
            industries: counts[0],
            past_issues: counts[1],
            stats,
        })
    }
}

/// Deletes a namespace's vectors if it has any. Errors are logged only.
async fn clear_namespace(store: &PineconeVectorStore, mode: SearchMode) {
    match store.namespace_exists().await {
        Ok(true) => match store.delete_all().await {
            Ok(()) => tracing::info!(namespace = %mode, "namespace cleared"),
            Err(err) => tracing::warn!(namespace = %mode, error = %err, "namespace clear failed"),
        },
        Ok(false) => tracing::info!(namespace = %mode, "namespace absent, nothing to clear"),
        Err(err) => tracing::warn!(namespace = %mode, error = %err, "namespace check failed"),
    }
}
