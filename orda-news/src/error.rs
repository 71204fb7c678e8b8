use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
    #[error("failed to write result file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize result: {0}")]
    Serde(#[from] serde_json::Error),
}
