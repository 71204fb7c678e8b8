use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreSqlError;
use crate::models::{
    DatabaseStats, NewIssue, PipelineLog, SimulationRecord, StoredIndustry, StoredIssue,
    StoredPastIssue,
};
use crate::repository::{IssueRepository, PipelineSnapshot};
use crate::{truncate_chars, RELATION_NAME_MAX_CHARS, TITLE_MAX_CHARS};

#[derive(Default)]
struct State {
    next_issue_id: i32,
    issues: Vec<StoredIssue>,
    logs: Vec<PipelineLog>,
    simulations: Vec<SimulationRecord>,
}

/// Process-local repository used when MySQL is not configured, and in tests.
#[derive(Default)]
pub struct InMemoryIssueStore {
    state: RwLock<State>,
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn simulation_records(&self) -> Vec<SimulationRecord> {
        self.state.read().await.simulations.clone()
    }
}

fn to_stored(id: i32, issue: &NewIssue) -> StoredIssue {
    let now = Utc::now().naive_utc();
    let mut related_industries: Vec<StoredIndustry> = issue
        .industries
        .iter()
        .map(|r| StoredIndustry {
            industry_name: Some(truncate_chars(&r.name, RELATION_NAME_MAX_CHARS)),
            final_score: Some(r.final_score),
            ai_reason: Some(r.ai_reason.clone()),
        })
        .collect();
    related_industries.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });

    let mut related_past_issues: Vec<StoredPastIssue> = issue
        .past_issues
        .iter()
        .map(|r| StoredPastIssue {
            issue_name: Some(truncate_chars(&r.name, RELATION_NAME_MAX_CHARS)),
            final_score: Some(r.final_score),
            period: Some(r.period.clone().unwrap_or_default()),
            ai_reason: Some(r.ai_reason.clone()),
        })
        .collect();
    related_past_issues.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });

    StoredIssue {
        id,
        issue_number: Some(issue.issue_number),
        title: truncate_chars(&issue.title, TITLE_MAX_CHARS),
        content: Some(issue.content.clone()),
        category: Some(issue.category.clone()),
        extracted_at: issue.extracted_at,
        stock_relevance_score: Some(issue.stock_relevance_score),
        ranking: Some(issue.ranking),
        rag_confidence: Some(issue.rag_confidence),
        created_at: Some(now),
        updated_at: Some(now),
        related_industries,
        related_past_issues,
    }
}

#[async_trait]
impl IssueRepository for InMemoryIssueStore {
    async fn save_pipeline_result(&self, snapshot: PipelineSnapshot) -> Result<usize, StoreSqlError> {
        let mut state = self.state.write().await;
        let mut issues = Vec::with_capacity(snapshot.issues.len());
        for issue in &snapshot.issues {
            state.next_issue_id += 1;
            issues.push(to_stored(state.next_issue_id, issue));
        }
        state.issues = issues;

        let log_id = state.logs.len() as i32 + 1;
        state.logs.push(PipelineLog {
            id: log_id,
            pipeline_id: Some(snapshot.log.pipeline_id),
            started_at: snapshot.log.started_at,
            completed_at: snapshot.log.completed_at,
            final_status: Some(snapshot.log.final_status),
            total_crawled: Some(snapshot.log.total_crawled),
            selected_count: Some(snapshot.log.selected_count),
            created_at: Some(Utc::now().naive_utc()),
        });
        Ok(snapshot.issues.len())
    }

    async fn latest_issues(&self) -> Result<Vec<StoredIssue>, StoreSqlError> {
        let mut issues = self.state.read().await.issues.clone();
        issues.sort_by_key(|issue| issue.ranking);
        Ok(issues)
    }

    async fn issue_with_relations(&self, id: i32) -> Result<Option<StoredIssue>, StoreSqlError> {
        Ok(self
            .state
            .read()
            .await
            .issues
            .iter()
            .find(|issue| issue.id == id)
            .cloned())
    }

    async fn latest_pipeline_log(&self) -> Result<Option<PipelineLog>, StoreSqlError> {
        Ok(self.state.read().await.logs.last().cloned())
    }

    async fn record_simulation(&self, record: SimulationRecord) -> Result<(), StoreSqlError> {
        self.state.write().await.simulations.push(record);
        Ok(())
    }

    async fn stats(&self) -> Result<DatabaseStats, StoreSqlError> {
        let state = self.state.read().await;
        Ok(DatabaseStats {
            current_issues: state.issues.len() as i64,
            simulation_results: state.simulations.len() as i64,
            db_size_mb: 0.0,
        })
    }

    async fn ping(&self) -> Result<(), StoreSqlError> {
        Ok(())
    }
}
