use sqlx::{MySqlConnection, MySqlPool};

use crate::error::StoreSqlError;
use crate::models::{
    NewIssue, NewRelation, PipelineLog, PipelineLogEntry, SimulationRecord, StoredIndustry,
    StoredIssue, StoredPastIssue,
};
use crate::{truncate_chars, RELATION_NAME_MAX_CHARS, TITLE_MAX_CHARS};

pub async fn clear_issues(conn: &mut MySqlConnection) -> Result<(), StoreSqlError> {
    for statement in [
        "DELETE FROM related_past_issues",
        "DELETE FROM related_industries",
        "DELETE FROM news_issues",
    ] {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

pub async fn insert_news_issue(
    conn: &mut MySqlConnection,
    issue: &NewIssue,
) -> Result<u64, StoreSqlError> {
    let result = sqlx::query(
        "INSERT INTO news_issues \
         (issue_number, title, content, category, extracted_at, stock_relevance_score, ranking, rag_confidence) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(issue.issue_number)
    .bind(truncate_chars(&issue.title, TITLE_MAX_CHARS))
    .bind(&issue.content)
    .bind(&issue.category)
    .bind(issue.extracted_at)
    .bind(issue.stock_relevance_score)
    .bind(issue.ranking)
    .bind(issue.rag_confidence)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn insert_related_industry(
    conn: &mut MySqlConnection,
    news_issue_id: u64,
    industry: &NewRelation,
) -> Result<(), StoreSqlError> {
    sqlx::query(
        "INSERT INTO related_industries (news_issue_id, industry_name, final_score, ai_reason) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(news_issue_id)
    .bind(truncate_chars(&industry.name, RELATION_NAME_MAX_CHARS))
    .bind(industry.final_score)
    .bind(&industry.ai_reason)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_related_past_issue(
    conn: &mut MySqlConnection,
    news_issue_id: u64,
    past_issue: &NewRelation,
) -> Result<(), StoreSqlError> {
    sqlx::query(
        "INSERT INTO related_past_issues (news_issue_id, issue_name, final_score, period, ai_reason) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(news_issue_id)
    .bind(truncate_chars(&past_issue.name, RELATION_NAME_MAX_CHARS))
    .bind(past_issue.final_score)
    .bind(past_issue.period.clone().unwrap_or_default())
    .bind(&past_issue.ai_reason)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_pipeline_log(
    conn: &mut MySqlConnection,
    log: &PipelineLogEntry,
) -> Result<(), StoreSqlError> {
    sqlx::query(
        "INSERT INTO pipeline_logs \
         (pipeline_id, started_at, completed_at, final_status, total_crawled, selected_count) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&log.pipeline_id)
    .bind(log.started_at)
    .bind(log.completed_at)
    .bind(&log.final_status)
    .bind(log.total_crawled)
    .bind(log.selected_count)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_simulation_result(
    pool: &MySqlPool,
    record: &SimulationRecord,
) -> Result<(), StoreSqlError> {
    sqlx::query(
        "INSERT INTO simulation_results \
         (issue_name, total_investment, total_final_value, total_profit_loss, prediction_accuracy) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(truncate_chars(&record.issue_name, RELATION_NAME_MAX_CHARS))
    .bind(record.total_investment)
    .bind(record.total_final_value)
    .bind(record.total_profit_loss)
    .bind(record.prediction_accuracy)
    .execute(pool)
    .await?;
    Ok(())
}

async fn attach_relations(pool: &MySqlPool, issue: &mut StoredIssue) -> Result<(), StoreSqlError> {
    issue.related_industries = sqlx::query_as::<_, StoredIndustry>(
        "SELECT industry_name, final_score, ai_reason FROM related_industries \
         WHERE news_issue_id = ? ORDER BY final_score DESC",
    )
    .bind(issue.id)
    .fetch_all(pool)
    .await?;

    issue.related_past_issues = sqlx::query_as::<_, StoredPastIssue>(
        "SELECT issue_name, final_score, period, ai_reason FROM related_past_issues \
         WHERE news_issue_id = ? ORDER BY final_score DESC",
    )
    .bind(issue.id)
    .fetch_all(pool)
    .await?;
    Ok(())
}

pub async fn fetch_latest_issues(pool: &MySqlPool) -> Result<Vec<StoredIssue>, StoreSqlError> {
    let mut issues =
        sqlx::query_as::<_, StoredIssue>("SELECT * FROM news_issues ORDER BY ranking ASC")
            .fetch_all(pool)
            .await?;
    for issue in &mut issues {
        attach_relations(pool, issue).await?;
    }
    Ok(issues)
}

pub async fn fetch_issue(pool: &MySqlPool, id: i32) -> Result<Option<StoredIssue>, StoreSqlError> {
    let issue = sqlx::query_as::<_, StoredIssue>("SELECT * FROM news_issues WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match issue {
        Some(mut issue) => {
            attach_relations(pool, &mut issue).await?;
            Ok(Some(issue))
        }
        None => Ok(None),
    }
}

pub async fn fetch_latest_pipeline_log(
    pool: &MySqlPool,
) -> Result<Option<PipelineLog>, StoreSqlError> {
    let log = sqlx::query_as::<_, PipelineLog>(
        "SELECT * FROM pipeline_logs ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(log)
}

pub(crate) async fn count_rows(pool: &MySqlPool, table: &str) -> Result<i64, StoreSqlError> {
    // Only called with crate::schema table names.
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}

pub async fn database_size_mb(pool: &MySqlPool) -> Result<f64, StoreSqlError> {
    let size: Option<f64> = sqlx::query_scalar(
        "SELECT CAST(SUM(data_length + index_length) / 1048576 AS DOUBLE) \
         FROM information_schema.tables WHERE table_schema = DATABASE()",
    )
    .fetch_one(pool)
    .await?;
    Ok(size.unwrap_or(0.0))
}
