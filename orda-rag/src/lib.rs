//! Retrieval-augmented analysis for Orda.
//!
//! News text is embedded and matched against two Pinecone namespaces,
//! `industry` and `past_issue`. Hits are rescored by an LLM, the best
//! reasons are checked against the news by a second model, and the result
//! is summarised as a two-part confidence.

pub mod diagnostics;
mod error;
mod knowledge;
mod prompts;
mod reference;
pub mod scoring;
mod service;
mod types;

pub use error::RagError;
pub use knowledge::{open_namespace_store, IndexPopulator, KnowledgeBase, PopulateReport, UPSERT_BATCH_SIZE};
pub use reference::{
    IndustryRecord, PastNewsPage, PastNewsRecord, ReferenceData, INDUSTRY_CSV, PAST_NEWS_CSV,
};
pub use scoring::{average_confidence, calculate_rag_confidence, combine_results};
pub use service::{RagService, DEFAULT_TOP_K, VERIFIED_CANDIDATES};
pub use types::{
    AiCandidate, Candidate, EnrichedIssue, FullAnalysis, IndustryInfo, PastIssueInfo,
    RagConfidence, SearchMode, Verification, VectorCandidate,
};
