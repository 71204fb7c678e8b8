use async_trait::async_trait;

use crate::error::StoreSqlError;
use crate::models::{
    DatabaseStats, NewIssue, PipelineLog, PipelineLogEntry, SimulationRecord, StoredIssue,
};

/// Everything one successful pipeline run persists.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineSnapshot {
    pub issues: Vec<NewIssue>,
    pub log: PipelineLogEntry,
}

/// Persistence for the "today's issues" view.
///
/// Saving a snapshot replaces all previously stored issues; only the latest
/// run is kept, while pipeline logs accumulate.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn save_pipeline_result(&self, snapshot: PipelineSnapshot) -> Result<usize, StoreSqlError>;

    /// Issues ordered by ranking, each with relations ordered by score.
    async fn latest_issues(&self) -> Result<Vec<StoredIssue>, StoreSqlError>;

    async fn issue_with_relations(&self, id: i32) -> Result<Option<StoredIssue>, StoreSqlError>;

    async fn latest_pipeline_log(&self) -> Result<Option<PipelineLog>, StoreSqlError>;

    async fn record_simulation(&self, record: SimulationRecord) -> Result<(), StoreSqlError>;

    async fn stats(&self) -> Result<DatabaseStats, StoreSqlError>;

    async fn ping(&self) -> Result<(), StoreSqlError>;
}
