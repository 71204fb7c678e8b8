//! The scheduled news pipeline.
//!
//! A run crawls and filters issues, enriches them through RAG, writes a
//! `*_Pipeline_Results.json` file and, from the background runner, replaces
//! the repository's "today's issues".

mod background;
mod error;
pub mod persist;
pub mod results;
mod service;
mod types;

pub use background::BackgroundPipeline;
pub use error::PipelineError;
pub use service::{
    latest_analyzed_issues, prepare_api_data, IssueAnalyzer, IssueCollector, LatestIssues,
    PipelineService, DEFAULT_ISSUES_PER_CATEGORY, DEFAULT_TARGET_FILTERED,
};
pub use types::{
    ApiDataBody, ApiIssue, ApiMetadata, ApiReadyData, CrawlingSummary, FinalSummary,
    IssueSource, PipelineResultFile, PipelineRun, PipelineStep, ProcessingDetails, RagSummary,
    ResultFileInfo, ResultFileStatus, ResultPipelineMetadata,
};
