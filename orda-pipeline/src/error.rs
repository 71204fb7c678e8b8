use orda_news::CrawlError;
use thiserror::Error;

use crate::PipelineStep;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("crawling failed: {0}")]
    Crawl(#[from] CrawlError),
    #[error("필터링된 이슈가 없습니다.")]
    NoFilteredIssues,
    #[error("failed to read result file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed result file: {0}")]
    Serde(#[from] serde_json::Error),
}

impl PipelineError {
    /// The step that was running when a pipeline run stopped, `None` for
    /// errors raised while reading saved results.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            PipelineError::Crawl(_) | PipelineError::NoFilteredIssues => {
                Some(PipelineStep::CrawlingAndFiltering)
            }
            PipelineError::Io(_) | PipelineError::Serde(_) => None,
        }
    }
}
