use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use orda_pipeline::{latest_analyzed_issues, IssueSource};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::detail::enrich_with_rag_details;
use crate::{ApiError, ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/latest", get(latest))
        .route("/past", get(past))
        .route("/pipeline-status", get(pipeline_status))
}

async fn latest(State(state): State<AppState>) -> Json<Value> {
    let latest = latest_analyzed_issues(Some(state.repository.as_ref()), &state.results_dir).await;
    let data = match latest.source {
        IssueSource::Repository => {
            let last_updated = latest
                .issues
                .first()
                .and_then(|issue| issue.get("updated_at"))
                .cloned()
                .unwrap_or(Value::Null);
            let issues = enrich_with_rag_details(latest.issues);
            json!({
                "count": issues.len(),
                "issues": issues,
                "source": "MySQL 실시간 데이터",
                "last_updated": last_updated,
                "rag_metadata": {
                    "verification_enabled": true,
                    "confidence_calculation": "multi_dimensional",
                    "scoring_method": "hybrid_vector_ai",
                },
            })
        }
        IssueSource::ResultFile => {
            let issues = enrich_with_rag_details(latest.issues);
            json!({
                "count": issues.len(),
                "issues": issues,
                "source": "파일 백업 데이터",
                "last_updated": "백그라운드 업데이트 대기 중",
            })
        }
        IssueSource::Empty => json!({
            "issues": [],
            "count": 0,
            "source": "데이터 없음",
            "message": "백그라운드 파이프라인이 첫 실행을 완료할 때까지 기다려주세요.",
        }),
    };
    Json(json!({ "success": true, "data": data }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PastQuery {
    #[serde(default = "default_past_limit")]
    limit: usize,
    search: Option<String>,
    industry: Option<String>,
}

fn default_past_limit() -> usize {
    100
}

async fn past(State(state): State<AppState>, Query(query): Query<PastQuery>) -> ApiResult<Json<Value>> {
    if state.reference.past_news.is_empty() {
        return Err(ApiError::internal(
            "서버에 과거 뉴스 데이터(CSV)가 로드되지 않았습니다.",
        ));
    }
    let page = state.reference.search_past_issues(
        query.limit,
        query.search.as_deref(),
        query.industry.as_deref(),
    );
    Ok(Json(json!({
        "success": true,
        "total": page.total,
        "data": page.data,
    })))
}

async fn pipeline_status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let log = state
        .repository
        .latest_pipeline_log()
        .await
        .map_err(|err| ApiError::internal(format!("파이프라인 상태 조회 실패: {err}")))?;
    let data = match log {
        Some(log) => json!(log),
        None => json!({
            "status": "대기 중",
            "message": "백그라운드 파이프라인이 아직 실행되지 않았습니다.",
        }),
    };
    Ok(Json(json!({ "success": true, "data": data })))
}
