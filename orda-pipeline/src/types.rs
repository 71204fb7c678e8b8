use std::fmt;

use orda_rag::{Candidate, EnrichedIssue, RagConfidence};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    CrawlingAndFiltering,
    RagAnalysis,
    ApiPreparation,
}

impl PipelineStep {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStep::CrawlingAndFiltering => "crawling_and_filtering",
            PipelineStep::RagAnalysis => "rag_analysis",
            PipelineStep::ApiPreparation => "api_preparation",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enriched issue in the ranked, API-facing shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiIssue {
    #[serde(rename = "이슈번호")]
    pub issue_number: u32,
    #[serde(rename = "제목")]
    pub title: String,
    #[serde(rename = "내용")]
    pub content: String,
    #[serde(rename = "카테고리")]
    pub category: String,
    #[serde(rename = "추출시간")]
    pub extracted_at: String,
    #[serde(rename = "주식시장_관련성_점수")]
    pub stock_relevance_score: f64,
    #[serde(rename = "순위")]
    pub rank: u32,
    #[serde(rename = "관련산업")]
    pub industries: Vec<Candidate>,
    #[serde(rename = "관련과거이슈")]
    pub past_issues: Vec<Candidate>,
    #[serde(rename = "RAG분석신뢰도")]
    pub confidence: RagConfidence,
}

impl From<&EnrichedIssue> for ApiIssue {
    fn from(enriched: &EnrichedIssue) -> Self {
        let scored = &enriched.issue;
        Self {
            issue_number: scored.issue.issue_number,
            title: scored.issue.title.clone(),
            content: scored.issue.body().to_string(),
            category: scored.issue.category.clone(),
            extracted_at: scored.issue.extracted_at.clone(),
            stock_relevance_score: scored.stock_relevance_score,
            rank: scored.rank.unwrap_or_default(),
            industries: enriched.industries.clone(),
            past_issues: enriched.past_issues.clone(),
            confidence: enriched.confidence,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiDataBody {
    pub total_crawled: usize,
    pub selected_count: usize,
    pub selection_criteria: String,
    pub selected_issues: Vec<ApiIssue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiMetadata {
    pub crawled_at: String,
    pub categories_processed: Vec<String>,
    pub ai_filter_applied: bool,
    pub rag_analysis_applied: bool,
    pub filter_model: String,
    pub rag_model: String,
    pub rag_confidence: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiReadyData {
    pub success: bool,
    pub data: ApiDataBody,
    pub metadata: ApiMetadata,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrawlingSummary {
    pub total_crawled: usize,
    pub filtered_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagSummary {
    pub analyzed_count: usize,
    pub average_confidence: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingDetails {
    pub crawled: usize,
    pub filtered: usize,
    pub analyzed: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub total_issues: usize,
    pub average_confidence: f64,
    pub processing_details: ProcessingDetails,
}

/// Record of one successful pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub pipeline_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub execution_time: String,
    pub final_status: String,
    pub steps_completed: Vec<PipelineStep>,
    pub crawling_result: CrawlingSummary,
    pub rag_result: RagSummary,
    pub api_ready_data: ApiReadyData,
    pub final_summary: FinalSummary,
    /// Empty when the result file could not be written.
    pub saved_file: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultPipelineMetadata {
    pub pipeline_id: String,
    pub steps_completed: Vec<PipelineStep>,
    pub final_status: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultFileInfo {
    pub filename: String,
    pub created_at: String,
    pub format_version: String,
}

/// Body of a `*_Pipeline_Results.json` file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineResultFile {
    pub timestamp: String,
    pub total_issues: usize,
    pub selected_issues: Vec<EnrichedIssue>,
    pub average_confidence: f64,
    pub processing_time: String,
    pub pipeline_metadata: ResultPipelineMetadata,
    pub file_info: ResultFileInfo,
}

/// Where analyzed issues were read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum IssueSource {
    Repository,
    ResultFile,
    Empty,
}

/// Status of the newest result file, for the pipeline status endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultFileStatus {
    pub last_execution: String,
    pub status: String,
    pub file_path: String,
    pub issues_count: u64,
    pub average_confidence: f64,
}
