use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use orda_news::output::display_now;
use orda_news::{CrawlAndFilterResult, CrawlError, CrawlingService, ScoredIssue};
use orda_rag::{average_confidence, EnrichedIssue, RagService};
use orda_store::IssueRepository;
use serde_json::Value;
use tracing::Instrument;

use crate::persist::stored_issue_to_api;
use crate::results::{latest_file_issues, save_pipeline_result};
use crate::{
    ApiDataBody, ApiIssue, ApiMetadata, ApiReadyData, CrawlingSummary, FinalSummary,
    IssueSource, PipelineError, PipelineRun, PipelineStep, ProcessingDetails, RagSummary,
};

pub const DEFAULT_ISSUES_PER_CATEGORY: usize = 10;
pub const DEFAULT_TARGET_FILTERED: usize = 5;
const SELECTION_CRITERIA: &str = "주식시장 영향도 + RAG 분석";
const FILTER_MODEL: &str = "gpt-4o-mini";
const RAG_MODEL: &str = "gpt-4o-mini";

/// First stage: crawl and keep the most market-relevant issues.
#[async_trait]
pub trait IssueCollector: Send + Sync {
    async fn crawl_and_filter(
        &self,
        issues_per_category: usize,
        target_filtered_count: usize,
    ) -> Result<CrawlAndFilterResult, CrawlError>;
}

#[async_trait]
impl IssueCollector for CrawlingService {
    async fn crawl_and_filter(
        &self,
        issues_per_category: usize,
        target_filtered_count: usize,
    ) -> Result<CrawlAndFilterResult, CrawlError> {
        self.crawl_and_filter_news(issues_per_category, target_filtered_count)
            .await
    }
}

/// Second stage: attach related industries and past issues.
#[async_trait]
pub trait IssueAnalyzer: Send + Sync {
    async fn analyze(&self, issues: &[ScoredIssue]) -> Vec<EnrichedIssue>;
}

#[async_trait]
impl IssueAnalyzer for RagService {
    async fn analyze(&self, issues: &[ScoredIssue]) -> Vec<EnrichedIssue> {
        self.analyze_issues_with_rag(issues).await
    }
}

/// Analyzed issues for the read endpoints, with where they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct LatestIssues {
    pub source: IssueSource,
    pub issues: Vec<Value>,
}

/// `H:MM:SS.ffffff`
fn format_elapsed(elapsed: chrono::Duration) -> String {
    let micros = elapsed.num_microseconds().unwrap_or_default().max(0);
    let secs = micros / 1_000_000;
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        micros % 1_000_000
    )
}

pub fn prepare_api_data(crawl: &CrawlAndFilterResult, enriched: &[EnrichedIssue]) -> ApiReadyData {
    let mut selected_issues: Vec<ApiIssue> = enriched.iter().map(ApiIssue::from).collect();
    selected_issues.sort_by_key(|issue| issue.rank);
    ApiReadyData {
        success: true,
        data: ApiDataBody {
            total_crawled: crawl.crawl.all_issues.len(),
            selected_count: enriched.len(),
            selection_criteria: SELECTION_CRITERIA.to_string(),
            selected_issues,
        },
        metadata: ApiMetadata {
            crawled_at: crawl.crawl.crawling_metadata.timestamp.clone(),
            categories_processed: crawl.crawl.crawling_metadata.categories_processed.clone(),
            ai_filter_applied: true,
            rag_analysis_applied: true,
            filter_model: FILTER_MODEL.to_string(),
            rag_model: RAG_MODEL.to_string(),
            rag_confidence: average_confidence(enriched),
        },
    }
}

/// Crawl, filter and RAG analysis end to end, plus read access to the
/// latest results.
pub struct PipelineService {
    collector: Arc<dyn IssueCollector>,
    analyzer: Arc<dyn IssueAnalyzer>,
    results_dir: PathBuf,
    repository: Option<Arc<dyn IssueRepository>>,
}

impl PipelineService {
    pub fn new(
        collector: Arc<dyn IssueCollector>,
        analyzer: Arc<dyn IssueAnalyzer>,
        results_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            collector,
            analyzer,
            results_dir: results_dir.into(),
            repository: None,
        }
    }

    pub fn with_repository(mut self, repository: Arc<dyn IssueRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn repository(&self) -> Option<&Arc<dyn IssueRepository>> {
        self.repository.as_ref()
    }

    pub async fn execute_full_pipeline(
        &self,
        issues_per_category: usize,
        target_filtered_count: usize,
    ) -> Result<PipelineRun, PipelineError> {
        let started = Local::now();
        let pipeline_id = started.format("%Y%m%d_%H%M%S").to_string();
        let span = tracing::info_span!("pipeline_run", pipeline_id = %pipeline_id);
        async move {
            tracing::info!(issues_per_category, target_filtered_count, "pipeline started");
            let mut steps_completed = Vec::new();

            let crawl = self
                .collector
                .crawl_and_filter(issues_per_category, target_filtered_count)
                .await?;
            let crawling_result = CrawlingSummary {
                total_crawled: crawl.crawl.all_issues.len(),
                filtered_count: crawl.filtered_issues.len(),
            };
            steps_completed.push(PipelineStep::CrawlingAndFiltering);
            if crawl.filtered_issues.is_empty() {
                return Err(PipelineError::NoFilteredIssues);
            }

            tracing::info!(count = crawl.filtered_issues.len(), "rag analysis started");
            let enriched = self.analyzer.analyze(&crawl.filtered_issues).await;
            let average = average_confidence(&enriched);
            let rag_result = RagSummary {
                analyzed_count: enriched.len(),
                average_confidence: average,
            };
            steps_completed.push(PipelineStep::RagAnalysis);

            let api_ready_data = prepare_api_data(&crawl, &enriched);
            steps_completed.push(PipelineStep::ApiPreparation);

            let completed = Local::now();
            let mut run = PipelineRun {
                pipeline_id: pipeline_id.clone(),
                started_at: started.format("%Y-%m-%d %H:%M:%S").to_string(),
                completed_at: display_now(),
                execution_time: format_elapsed(completed - started),
                final_status: "success".to_string(),
                steps_completed,
                crawling_result,
                rag_result,
                api_ready_data,
                final_summary: FinalSummary {
                    total_issues: enriched.len(),
                    average_confidence: average,
                    processing_details: ProcessingDetails {
                        crawled: crawling_result.total_crawled,
                        filtered: crawling_result.filtered_count,
                        analyzed: enriched.len(),
                    },
                },
                saved_file: String::new(),
            };

            match save_pipeline_result(&self.results_dir, &run, &enriched).await {
                Ok(path) => run.saved_file = path.display().to_string(),
                Err(err) => tracing::warn!(error = %err, "pipeline result file not saved"),
            }
            tracing::info!(
                analyzed = enriched.len(),
                execution_time = %run.execution_time,
                "pipeline completed"
            );
            Ok(run)
        }
        .instrument(span)
        .await
    }

    /// Repository contents when there are any, else the newest result file.
    pub async fn latest_analyzed_issues(&self) -> LatestIssues {
        latest_analyzed_issues(self.repository.as_deref(), &self.results_dir).await
    }
}

pub async fn latest_analyzed_issues(
    repository: Option<&dyn IssueRepository>,
    results_dir: &Path,
) -> LatestIssues {
    if let Some(repository) = repository {
        match repository.latest_issues().await {
            Ok(stored) if !stored.is_empty() => {
                return LatestIssues {
                    source: IssueSource::Repository,
                    issues: stored.iter().map(stored_issue_to_api).collect(),
                };
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "repository read failed"),
        }
    }

    let issues = latest_file_issues(results_dir).await.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "result file read failed");
        Vec::new()
    });
    let source = if issues.is_empty() {
        IssueSource::Empty
    } else {
        IssueSource::ResultFile
    };
    LatestIssues { source, issues }
}
