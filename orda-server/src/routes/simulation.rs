use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use orda_simulation::{CalculationRequest, IndustryRequest, StockRequest, ValidationResponse};
use orda_store::SimulationRecord;
use serde_json::{json, Value};

use crate::{ApiError, ApiResult, AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze_industries", post(analyze_industries))
        .route("/analyze_stocks", post(analyze_stocks))
        .route("/calculate_result", post(calculate_result))
        .route("/validate", post(validate))
}

/// Step 1: industries the event touched.
async fn analyze_industries(
    State(state): State<AppState>,
    Json(request): Json<IndustryRequest>,
) -> ApiResult<Json<Value>> {
    let analysis = state
        .simulation
        .advisor()
        .analyze_issue_for_industries(&request.issue_name, &request.issue_description)
        .await
        .ok_or_else(|| ApiError::internal("AI 산업 분석에 실패했습니다."))?;
    Ok(Json(json!({ "success": true, "data": analysis })))
}

/// Step 2: stocks for the chosen industry and their pre-event chart.
async fn analyze_stocks(
    State(state): State<AppState>,
    Json(request): Json<StockRequest>,
) -> ApiResult<Json<Value>> {
    let analysis = state
        .simulation
        .advisor()
        .analyze_industry_for_stocks(&request.issue_name, &request.industry_name)
        .await
        .ok_or_else(|| ApiError::internal("AI 종목 분석에 실패했습니다."))?;
    let tickers = analysis.tickers();
    if tickers.is_empty() {
        return Err(ApiError::not_found("AI가 관련 종목을 찾지 못했습니다."));
    }
    let chart = state
        .simulation
        .stock_chart(&request.issue_date, &tickers, false)
        .await;
    Ok(Json(json!({
        "success": true,
        "data": { "ai_analysis": analysis, "tickers": tickers, "chart": chart },
    })))
}

/// Step 3: score the player's stakes and keep a record of the game.
async fn calculate_result(
    State(state): State<AppState>,
    Json(request): Json<CalculationRequest>,
) -> ApiResult<Json<Value>> {
    let outcome = state.simulation.calculate_result(&request).await;
    let summary = &outcome.summary;
    match SimulationRecord::whole_won(summary.total_investment) {
        Some(total_investment) => {
            let record = SimulationRecord {
                issue_name: outcome.issue_name.clone(),
                total_investment,
                total_final_value: summary.total_final_value,
                total_profit_loss: summary.total_profit_loss,
                prediction_accuracy: summary.prediction_accuracy,
            };
            if let Err(err) = state.repository.record_simulation(record).await {
                tracing::warn!(error = %err, "simulation result not recorded");
            }
        }
        None => tracing::warn!(
            total_investment = summary.total_investment,
            "simulation result not recorded, total investment out of range"
        ),
    }
    Ok(Json(json!({ "success": true, "data": outcome })))
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<CalculationRequest>,
) -> Json<ValidationResponse> {
    Json(state.simulation.validate(&request))
}
