use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

use crate::error::StoreSqlError;
use crate::migrations::run_migrations;
use crate::models::{DatabaseStats, PipelineLog, SimulationRecord, StoredIssue};
use crate::repository::{IssueRepository, PipelineSnapshot};
use crate::{ops, schema};

/// Connection settings, read from `MYSQL_*` variables by the binary.
#[derive(Clone, Debug)]
pub struct MySqlSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
}

impl MySqlSettings {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.database)
            .charset("utf8mb4")
    }
}

#[derive(Debug, Clone)]
pub struct MySqlIssueStore {
    pool: MySqlPool,
}

#[derive(Debug, Clone)]
pub struct MySqlIssueStoreBuilder {
    settings: MySqlSettings,
    max_connections: u32,
    run_migrations: bool,
}

impl MySqlIssueStore {
    pub fn builder(settings: MySqlSettings) -> MySqlIssueStoreBuilder {
        MySqlIssueStoreBuilder {
            settings,
            max_connections: 5,
            run_migrations: true,
        }
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl MySqlIssueStoreBuilder {
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn run_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    pub async fn build(self) -> Result<MySqlIssueStore, StoreSqlError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.settings.connect_options())
            .await
            .map_err(StoreSqlError::Connection)?;

        tracing::info!(
            host = %self.settings.host,
            port = self.settings.port,
            database = %self.settings.database,
            "mysql connected"
        );

        if self.run_migrations {
            run_migrations(&pool).await?;
        }

        Ok(MySqlIssueStore { pool })
    }
}

#[async_trait]
impl IssueRepository for MySqlIssueStore {
    async fn save_pipeline_result(&self, snapshot: PipelineSnapshot) -> Result<usize, StoreSqlError> {
        let mut tx = self.pool.begin().await?;

        ops::clear_issues(&mut tx).await?;
        for issue in &snapshot.issues {
            let issue_id = ops::insert_news_issue(&mut tx, issue).await?;
            for industry in &issue.industries {
                ops::insert_related_industry(&mut tx, issue_id, industry).await?;
            }
            for past_issue in &issue.past_issues {
                ops::insert_related_past_issue(&mut tx, issue_id, past_issue).await?;
            }
        }
        ops::insert_pipeline_log(&mut tx, &snapshot.log).await?;

        tx.commit().await?;
        tracing::info!(issues = snapshot.issues.len(), pipeline_id = %snapshot.log.pipeline_id, "pipeline result saved to mysql");
        Ok(snapshot.issues.len())
    }

    async fn latest_issues(&self) -> Result<Vec<StoredIssue>, StoreSqlError> {
        ops::fetch_latest_issues(&self.pool).await
    }

    async fn issue_with_relations(&self, id: i32) -> Result<Option<StoredIssue>, StoreSqlError> {
        ops::fetch_issue(&self.pool, id).await
    }

    async fn latest_pipeline_log(&self) -> Result<Option<PipelineLog>, StoreSqlError> {
        ops::fetch_latest_pipeline_log(&self.pool).await
    }

    async fn record_simulation(&self, record: SimulationRecord) -> Result<(), StoreSqlError> {
        ops::insert_simulation_result(&self.pool, &record).await
    }

    async fn stats(&self) -> Result<DatabaseStats, StoreSqlError> {
        Ok(DatabaseStats {
            current_issues: ops::count_rows(&self.pool, schema::NEWS_ISSUES_TABLE).await?,
            simulation_results: ops::count_rows(&self.pool, schema::SIMULATION_RESULTS_TABLE)
                .await?,
            db_size_mb: ops::database_size_mb(&self.pool).await?,
        })
    }

    async fn ping(&self) -> Result<(), StoreSqlError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
