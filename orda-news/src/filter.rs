use std::path::PathBuf;
use std::sync::Arc;

use orda_core::{mean, JsonOutputParser, Runnable, RunnableExt};
use orda_llm::{models, ChatModel, Llm};
use orda_prompt::{vars, ChatPromptTemplate, PromptVars};
use serde::Serialize;

use crate::output::{display_now, file_timestamp, iso_now, write_json};
use crate::prompts::{RELEVANCE_HUMAN, RELEVANCE_SYSTEM};
use crate::{CrawlError, CrawledIssue, FilterMetadata, FilterResult, RelevanceAnalysis, ScoredIssue};

const FILTERING_METHOD: &str = "gpt-4o-mini_stock_relevance";
const NO_ISSUES_METHOD: &str = "no_issues_to_filter";
const FILTER_VERSION: &str = "StockRelevanceFilter_v2.0_WithReasons";

type RelevanceChain = Arc<dyn Runnable<PromptVars, RelevanceAnalysis> + Send + Sync>;

/// Scores issues for stock-market impact and keeps the highest ranked.
pub struct StockRelevanceFilter {
    chain: RelevanceChain,
    data_dir: PathBuf,
}

#[derive(Serialize)]
struct FilterFileInfo {
    filename: String,
    created_at: String,
    filter_version: &'static str,
}

#[derive(Serialize)]
struct FilterFile<'a> {
    #[serde(flatten)]
    result: &'a FilterResult,
    file_info: FilterFileInfo,
}

impl StockRelevanceFilter {
    pub fn new(llm: Arc<dyn Llm>, data_dir: impl Into<PathBuf>) -> Self {
        let chain = ChatPromptTemplate::system_human(RELEVANCE_SYSTEM, RELEVANCE_HUMAN)
            .then(ChatModel::new(llm, models::GPT_4O_MINI).temperature(0.0).json())
            .then(JsonOutputParser::<RelevanceAnalysis>::new());
        Self {
            chain: Arc::new(chain),
            data_dir: data_dir.into(),
        }
    }

    /// Scores one issue. Never fails: errors become a neutral analysis.
    pub async fn analyze(&self, issue: &CrawledIssue) -> RelevanceAnalysis {
        let input = vars([
            ("title", issue.title.clone()),
            ("content", issue.content.clone()),
        ]);
        match self.chain.invoke(input).await {
            Ok(analysis) => analysis,
            Err(err) => {
                tracing::warn!(issue = issue.issue_number, error = %err, "relevance analysis failed");
                RelevanceAnalysis::fallback(&err.to_string())
            }
        }
    }

    pub async fn filter(
        &self,
        issues: &[CrawledIssue],
        target: usize,
    ) -> Result<FilterResult, CrawlError> {
        if issues.is_empty() {
            return Ok(Self::empty_result());
        }

        tracing::info!(total = issues.len(), target, "stock relevance filtering started");
        let mut scored = Vec::with_capacity(issues.len());
        for (position, issue) in issues.iter().enumerate() {
            tracing::debug!(position = position + 1, title = %issue.title, "scoring issue");
            let analysis = self.analyze(issue).await;
            scored.push(ScoredIssue {
                issue: issue.clone(),
                stock_relevance_score: analysis.total_score,
                analysis,
                rank: None,
            });
        }

        // sort_by is stable, ties keep crawl order
        scored.sort_by(|a, b| b.stock_relevance_score.total_cmp(&a.stock_relevance_score));
        scored.truncate(target);
        for (rank, issue) in scored.iter_mut().enumerate() {
            issue.rank = Some(rank as u32 + 1);
        }

        let scores: Vec<f64> = scored.iter().map(|i| i.stock_relevance_score).collect();
        let result = FilterResult {
            filter_metadata: FilterMetadata {
                filtering_method: FILTERING_METHOD.to_string(),
                original_count: issues.len(),
                selected_count: scored.len(),
                average_score: Some(mean(&scores).unwrap_or(0.0)),
                filtered_at: display_now(),
            },
            selected_issues: scored,
        };

        self.save(&result).await?;
        tracing::info!(selected = result.selected_issues.len(), "stock relevance filtering done");
        Ok(result)
    }

    fn empty_result() -> FilterResult {
        FilterResult {
            selected_issues: Vec::new(),
            filter_metadata: FilterMetadata {
                filtering_method: NO_ISSUES_METHOD.to_string(),
                original_count: 0,
                selected_count: 0,
                average_score: None,
                filtered_at: display_now(),
            },
        }
    }

    async fn save(&self, result: &FilterResult) -> Result<PathBuf, CrawlError> {
        let filename = format!(
            "{}_StockFiltered_{}issues.json",
            file_timestamp(),
            result.selected_issues.len()
        );
        let file = FilterFile {
            result,
            file_info: FilterFileInfo {
                filename: filename.clone(),
                created_at: iso_now(),
                filter_version: FILTER_VERSION,
            },
        };
        write_json(&self.data_dir, &filename, &file).await
    }
}

