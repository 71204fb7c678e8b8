use std::fmt;

use orda_news::ScoredIssue;
use serde::{Deserialize, Serialize};

/// Knowledge-base namespace a search runs against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Industry,
    PastIssue,
}

impl SearchMode {
    pub const ALL: [SearchMode; 2] = [SearchMode::Industry, SearchMode::PastIssue];

    pub fn namespace(self) -> &'static str {
        match self {
            SearchMode::Industry => "industry",
            SearchMode::PastIssue => "past_issue",
        }
    }

    /// Key the reranker uses for the candidate name.
    pub(crate) fn field_name(self) -> &'static str {
        match self {
            SearchMode::Industry => "industry",
            SearchMode::PastIssue => "issue",
        }
    }

    pub(crate) fn task_description(self) -> &'static str {
        match self {
            SearchMode::Industry => {
                "뉴스와 가장 관련성이 높은 순서대로 순위를 매기고 점수와 이유를 부여"
            }
            SearchMode::PastIssue => {
                "현재 뉴스와 가장 유사한 패턴을 보이는 순서대로 순위를 매기고 점수와 이유를 부여"
            }
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// A deduplicated vector hit, similarity on a 0-100 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorCandidate {
    pub name: String,
    pub similarity: f64,
    pub description: String,
    pub period: Option<String>,
}

/// One reranked entry as returned by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct AiCandidate {
    pub name: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub is_grounded: bool,
    #[serde(default)]
    pub supporting_quote: String,
    #[serde(default)]
    pub unverified_reason: String,
}

impl Verification {
    pub fn ungrounded(reason: &str) -> Self {
        Self {
            is_grounded: false,
            supporting_quote: String::new(),
            unverified_reason: reason.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub vector_score: f64,
    pub ai_score: f64,
    pub ai_reason: String,
    pub description: String,
    pub period: Option<String>,
    pub final_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RagConfidence {
    pub consistency_score: f64,
    pub peak_relevance_score: f64,
}

/// A filtered issue with its related industries and past issues attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedIssue {
    #[serde(flatten)]
    pub issue: ScoredIssue,
    #[serde(rename = "관련산업")]
    pub industries: Vec<Candidate>,
    #[serde(rename = "관련과거이슈")]
    pub past_issues: Vec<Candidate>,
    #[serde(rename = "RAG분석신뢰도")]
    pub confidence: RagConfidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PastIssueInfo {
    pub issue_name: String,
    pub contents: String,
    pub similarity_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndustryInfo {
    pub industry_name: String,
    pub description: String,
    pub similarity_score: f64,
}

/// Response of the free-text analysis endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub explanation: String,
    pub confidence: f64,
    pub past_issues: Vec<PastIssueInfo>,
    pub industries: Vec<IndustryInfo>,
}
