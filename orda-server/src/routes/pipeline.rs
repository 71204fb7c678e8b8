use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use orda_pipeline::latest_analyzed_issues;
use orda_pipeline::results::latest_file_status;
use serde_json::{json, Value};

use crate::{ApiError, ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/today-issues", get(today_issues))
        .route("/refresh-issues", post(refresh_issues))
        .route("/status", get(status))
}

async fn today_issues(State(state): State<AppState>) -> Json<Vec<Value>> {
    let latest = latest_analyzed_issues(Some(state.repository.as_ref()), &state.results_dir).await;
    Json(latest.issues)
}

/// Starts a run in the background and returns immediately.
async fn refresh_issues(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let background = state
        .pipeline
        .clone()
        .ok_or_else(|| ApiError::unavailable("파이프라인이 설정되지 않았습니다."))?;
    tokio::spawn(async move {
        background.run_once().await;
    });
    Ok(Json(json!({
        "success": true,
        "message": "오늘의 이슈 데이터 새로고침을 시작합니다. 약 3~5분 소요됩니다.",
        "status": "파이프라인이 백그라운드에서 실행 중입니다.",
    })))
}

async fn status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let status = latest_file_status(&state.results_dir)
        .await
        .map_err(|err| ApiError::internal(format!("상태 조회 실패: {err}")))?;
    let data = match status {
        Some(status) => json!(status),
        None => json!({
            "status": "no_executions",
            "message": "아직 실행된 파이프라인이 없습니다.",
        }),
    };
    Ok(Json(json!({ "success": true, "data": data })))
}
