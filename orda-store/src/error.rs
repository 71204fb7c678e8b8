use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreSqlError {
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("database is not available: {0}")]
    Unavailable(String),
}
