use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use orda_rag::FullAnalysis;
use serde::Deserialize;

use crate::{ApiError, ApiResult, AppState};

const MAX_PAST_ISSUES: usize = 3;
const MAX_INDUSTRIES: usize = 3;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/analysis", post(analysis))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisRequest {
    content: String,
}

async fn analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> ApiResult<Json<FullAnalysis>> {
    let rag = state
        .rag
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("분석 서비스가 준비되지 않았습니다."))?;
    let analysis = rag
        .comprehensive_analysis(&request.content, MAX_PAST_ISSUES, MAX_INDUSTRIES)
        .await
        .map_err(|err| ApiError::internal(format!("뉴스 분석 중 오류 발생: {err}")))?;
    Ok(Json(analysis))
}
