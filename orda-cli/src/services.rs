//! Builds the shared services from configuration.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use orda_core::{Embedding, RunnableExt};
use orda_embeddings::{OpenAiEmbedding, TEXT_EMBEDDING_3_SMALL_DIMENSION};
use orda_llm::{Llm, OpenAiClient};
use orda_news::{BigKindsConfig, BigKindsSource, CrawlingService, DEFAULT_CATEGORIES};
use orda_pinecone::{PineconeIndexAdmin, PineconeVectorStore};
use orda_pipeline::{BackgroundPipeline, PipelineService};
use orda_rag::{open_namespace_store, RagService, ReferenceData, SearchMode};
use orda_simulation::{SimulationAdvisor, SimulationService, YahooFinanceSource};
use orda_store::{InMemoryIssueStore, IssueRepository, MySqlIssueStore};
use secrecy::ExposeSecret;

use crate::config::{MySqlConfig, OpenAiConfig, OrdaConfig, PineconeConfig};

const LLM_ATTEMPTS: usize = 3;

/// Chat model client with retries on provider errors and timeouts.
pub fn chat_llm(config: &OpenAiConfig) -> anyhow::Result<Arc<dyn Llm>> {
    let client = OpenAiClient::with_base_url(config.api_key()?, &config.openai_base_url)
        .context("invalid OpenAI client configuration")?;
    Ok(Arc::new(client.with_retries(LLM_ATTEMPTS)))
}

pub fn embedder(config: &OpenAiConfig) -> anyhow::Result<Arc<dyn Embedding>> {
    let api_key = config.api_key()?;
    let api_base = format!("{}/v1", config.openai_base_url.trim_end_matches('/'));
    let client = async_openai::Client::with_config(
        OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(api_base),
    );
    Ok(Arc::new(OpenAiEmbedding::with_client(
        client,
        config.openai_embedding_model.clone(),
        TEXT_EMBEDDING_3_SMALL_DIMENSION,
    )))
}

/// MySQL when reachable, otherwise a process-local store.
pub async fn repository(config: &MySqlConfig) -> Arc<dyn IssueRepository> {
    match MySqlIssueStore::builder(config.settings()).build().await {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::warn!(error = %err, "MySQL unavailable, issues are kept in memory");
            Arc::new(InMemoryIssueStore::new())
        }
    }
}

/// Reference CSVs, or empty tables when they cannot be read.
pub fn reference_data(data_dir: &Path) -> ReferenceData {
    ReferenceData::load_dir(data_dir).unwrap_or_else(|err| {
        tracing::warn!(data_dir = %data_dir.display(), error = %err, "reference data not loaded");
        ReferenceData::default()
    })
}

/// Data-plane stores for both namespaces of the knowledge index.
pub async fn namespace_stores(
    config: &PineconeConfig,
    embedder: Arc<dyn Embedding>,
) -> anyhow::Result<Vec<(SearchMode, PineconeVectorStore)>> {
    let api_key = config.api_key()?;
    let admin = PineconeIndexAdmin::new(config.pinecone_control_url.clone(), api_key.clone())?;
    let host = admin
        .index_host(&config.pinecone_index_name)
        .await
        .with_context(|| format!("index {} not found", config.pinecone_index_name))?;

    let mut stores = Vec::with_capacity(SearchMode::ALL.len());
    for mode in SearchMode::ALL {
        let store = open_namespace_store(
            &host,
            api_key.clone(),
            embedder.clone(),
            &config.pinecone_index_name,
            mode,
        )
        .await?;
        stores.push((mode, store));
    }
    Ok(stores)
}

pub async fn rag_service(config: &OrdaConfig, llm: Arc<dyn Llm>) -> anyhow::Result<RagService> {
    let embedder = embedder(&config.openai)?;
    let mut industry = None;
    let mut past_issue = None;
    for (mode, store) in namespace_stores(&config.pinecone, embedder.clone()).await? {
        match mode {
            SearchMode::Industry => industry = Some(store),
            SearchMode::PastIssue => past_issue = Some(store),
        }
    }
    let industry = industry.context("industry namespace missing")?;
    let past_issue = past_issue.context("past issue namespace missing")?;
    Ok(RagService::new(
        embedder,
        Arc::new(industry),
        Arc::new(past_issue),
        llm,
    ))
}

pub fn simulation_service(
    config: &OrdaConfig,
    llm: Arc<dyn Llm>,
) -> anyhow::Result<SimulationService> {
    let prices = YahooFinanceSource::new().context("price client")?;
    Ok(SimulationService::new(
        SimulationAdvisor::new(llm),
        Arc::new(prices),
        config.simulation.limits()?,
    ))
}

pub fn background_pipeline(
    config: &OrdaConfig,
    llm: Arc<dyn Llm>,
    rag: Arc<RagService>,
    repository: Arc<dyn IssueRepository>,
) -> anyhow::Result<Arc<BackgroundPipeline>> {
    let pipeline = &config.pipeline;
    let source = BigKindsSource::new(
        BigKindsConfig::default()
            .with_base_url(pipeline.bigkinds_base_url.clone())
            .with_timeout(Duration::from_secs(pipeline.crawling_timeout)),
    )
    .context("news client")?;
    let crawling = CrawlingService::new(
        Arc::new(source),
        llm,
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        config.paths.results_dir.clone(),
    );
    let service = PipelineService::new(
        Arc::new(crawling),
        rag,
        config.paths.results_dir.clone(),
    )
    .with_repository(repository);
    Ok(Arc::new(BackgroundPipeline::new(
        Arc::new(service),
        pipeline.issues_per_category,
        pipeline.target_filtered_count,
    )))
}
