use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

const NOT_READY: &str = "데이터베이스 서비스가 준비되지 않았습니다.";

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/past-issues", get(past_issues))
        .route("/industries", get(industries))
        .route("/stats", get(stats))
}

#[derive(Debug, Serialize)]
pub(crate) struct PastIssue {
    id: String,
    issue_name: String,
    contents: String,
    related_industries: String,
    start_date: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Industry {
    krx_name: String,
    description: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DatabaseStats {
    industries: usize,
    past_issues: usize,
    current_issues: i64,
    simulation_results: i64,
    db_size_mb: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PastIssueQuery {
    #[serde(default = "default_past_limit")]
    limit: usize,
    search: Option<String>,
    industry: Option<String>,
}

fn default_past_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndustryQuery {
    search: Option<String>,
    #[serde(default = "default_industry_limit")]
    limit: usize,
}

fn default_industry_limit() -> usize {
    50
}

async fn past_issues(
    State(state): State<AppState>,
    Query(query): Query<PastIssueQuery>,
) -> ApiResult<Json<Vec<PastIssue>>> {
    if state.reference.past_news.is_empty() {
        return Err(ApiError::unavailable(NOT_READY));
    }
    let page = state.reference.search_past_issues(
        query.limit,
        query.search.as_deref(),
        query.industry.as_deref(),
    );
    Ok(Json(
        page.data
            .into_iter()
            .map(|r| PastIssue {
                id: r.id,
                issue_name: r.title,
                contents: r.summary,
                related_industries: r.related_industries,
                start_date: r.start_date,
            })
            .collect(),
    ))
}

async fn industries(
    State(state): State<AppState>,
    Query(query): Query<IndustryQuery>,
) -> ApiResult<Json<Vec<Industry>>> {
    if state.reference.industries.is_empty() {
        return Err(ApiError::unavailable(NOT_READY));
    }
    Ok(Json(
        state
            .reference
            .search_industries(query.search.as_deref(), query.limit)
            .into_iter()
            .map(|r| Industry {
                krx_name: r.krx_name,
                description: r.description,
            })
            .collect(),
    ))
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<DatabaseStats>> {
    let stored = state
        .repository
        .stats()
        .await
        .map_err(|err| ApiError::internal(err.to_string()))?;
    Ok(Json(DatabaseStats {
        industries: state.reference.industries.len(),
        past_issues: state.reference.past_news.len(),
        current_issues: stored.current_issues,
        simulation_results: stored.simulation_results,
        db_size_mb: stored.db_size_mb,
    }))
}
