use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde_json::{json, Map, Value};

use crate::AppState;

fn component(status: &str, message: String) -> Value {
    json!({ "status": status, "message": message })
}

/// Database reachability and the outcome of the last pipeline run.
pub(crate) async fn health(State(state): State<AppState>) -> Json<Value> {
    let mut components = Map::new();

    let database = match state.repository.ping().await {
        Ok(()) => component("ok", "MySQL 연결 정상".to_string()),
        Err(err) => component("error", format!("MySQL 연결 실패: {err}")),
    };
    components.insert("mysql_database".to_string(), database);

    let pipeline = match state.repository.latest_pipeline_log().await {
        Ok(Some(log)) if log.final_status.as_deref() == Some("success") => {
            let completed = log
                .completed_at
                .map(|t| t.to_string())
                .unwrap_or_default();
            component("ok", format!("최근 실행 성공: {completed}"))
        }
        Ok(_) => component("warning", "최근 실행 로그 없음 또는 실패".to_string()),
        Err(err) => component("error", format!("파이프라인 상태 확인 실패: {err}")),
    };
    components.insert("background_pipeline".to_string(), pipeline);

    let all_ok = components.values().all(|c| c["status"] == "ok");
    Json(json!({
        "status": if all_ok { "ok" } else { "degraded" },
        "timestamp": Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        "components": components,
        "message": if all_ok { "모든 서비스 정상" } else { "일부 서비스에 문제가 있습니다." },
    }))
}
