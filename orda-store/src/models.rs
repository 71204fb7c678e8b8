use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An analyzed issue ready to be written, with its ranked relations.
#[derive(Clone, Debug, PartialEq)]
pub struct NewIssue {
    pub issue_number: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub extracted_at: Option<NaiveDateTime>,
    pub stock_relevance_score: f64,
    pub ranking: i32,
    pub rag_confidence: f64,
    pub industries: Vec<NewRelation>,
    pub past_issues: Vec<NewRelation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewRelation {
    pub name: String,
    pub final_score: f64,
    pub period: Option<String>,
    pub ai_reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineLogEntry {
    pub pipeline_id: String,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub final_status: String,
    pub total_crawled: i32,
    pub selected_count: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub issue_name: String,
    pub total_investment: i64,
    pub total_final_value: f64,
    pub total_profit_loss: f64,
    pub prediction_accuracy: f64,
}

impl SimulationRecord {
    /// Rounds a won amount for the BIGINT column; `None` when it is not
    /// finite or falls outside `i64`.
    pub fn whole_won(amount: f64) -> Option<i64> {
        let rounded = amount.round();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64)
            .then_some(rounded as i64)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredIndustry {
    pub industry_name: Option<String>,
    pub final_score: Option<f64>,
    pub ai_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredPastIssue {
    pub issue_name: Option<String>,
    pub final_score: Option<f64>,
    pub period: Option<String>,
    pub ai_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredIssue {
    pub id: i32,
    pub issue_number: Option<i32>,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub extracted_at: Option<NaiveDateTime>,
    pub stock_relevance_score: Option<f64>,
    pub ranking: Option<i32>,
    pub rag_confidence: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    #[sqlx(skip)]
    #[serde(default)]
    pub related_industries: Vec<StoredIndustry>,
    #[sqlx(skip)]
    #[serde(default)]
    pub related_past_issues: Vec<StoredPastIssue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PipelineLog {
    pub id: i32,
    pub pipeline_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub final_status: Option<String>,
    pub total_crawled: Option<i32>,
    pub selected_count: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub current_issues: i64,
    pub simulation_results: i64,
    pub db_size_mb: f64,
}
