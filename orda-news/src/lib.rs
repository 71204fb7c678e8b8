//! News ingestion for Orda.
//!
//! Issues are pulled per category from a [`NewsSource`], numbered by the
//! [`Crawler`], then scored for stock-market relevance by the
//! [`StockRelevanceFilter`] which keeps the top few for RAG analysis.

mod bigkinds;
mod crawler;
mod error;
mod filter;
pub mod output;
mod prompts;
mod service;
mod types;

pub use bigkinds::{BigKindsConfig, BigKindsSource, DEFAULT_BIGKINDS_URL, DEFAULT_CATEGORIES};
pub use crawler::Crawler;
pub use error::CrawlError;
pub use filter::StockRelevanceFilter;
pub use service::CrawlingService;
pub use types::{
    CrawlAndFilterResult, CrawlMetadata, CrawlResult, CrawledIssue, FilterMetadata, FilterResult,
    NewsSource, RawIssue, RelevanceAnalysis, ScoredIssue,
};
