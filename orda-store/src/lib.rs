pub mod error;
mod memory;
pub mod migrations;
mod models;
mod mysql;
pub mod ops;
mod repository;
pub mod schema;

pub use error::StoreSqlError;
pub use memory::InMemoryIssueStore;
pub use models::{
    DatabaseStats, NewIssue, NewRelation, PipelineLog, PipelineLogEntry, SimulationRecord,
    StoredIssue, StoredIndustry, StoredPastIssue,
};
pub use mysql::{MySqlIssueStore, MySqlIssueStoreBuilder, MySqlSettings};
pub use repository::{IssueRepository, PipelineSnapshot};

/// Column limits shared by both repository implementations.
pub const TITLE_MAX_CHARS: usize = 500;
pub const RELATION_NAME_MAX_CHARS: usize = 200;

pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
