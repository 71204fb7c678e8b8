//! Detail fields the issue endpoints add on top of stored or file-backed
//! issues: per-candidate score breakdowns and a confidence summary.
//!
//! Input is loosely typed JSON because stored rows, current result files
//! and legacy result files disagree on shape.

use orda_rag::scoring::{AI_WEIGHT, VECTOR_WEIGHT};
use serde_json::{json, Map, Value};

const INDUSTRY_KEY: &str = "관련산업";
const PAST_ISSUE_KEY: &str = "관련과거이슈";
const CONFIDENCE_KEY: &str = "RAG분석신뢰도";

#[derive(Clone, Copy)]
enum CandidateKind {
    Industry,
    PastIssue,
}

impl CandidateKind {
    fn missing_name(self) -> &'static str {
        match self {
            CandidateKind::Industry => "산업명 없음",
            CandidateKind::PastIssue => "이슈명 없음",
        }
    }
}

fn unverified() -> Value {
    json!({ "is_grounded": false, "supporting_quote": "" })
}

fn breakdown(penalty_applied: bool) -> Value {
    json!({
        "vector_weight": VECTOR_WEIGHT,
        "ai_weight": AI_WEIGHT,
        "penalty_applied": penalty_applied,
    })
}

fn number_or_zero(object: &Map<String, Value>, key: &str) -> Value {
    object
        .get(key)
        .filter(|v| v.is_number())
        .cloned()
        .unwrap_or_else(|| json!(0))
}

fn text_or(object: &Map<String, Value>, key: &str, default: &str) -> Value {
    match object.get(key) {
        Some(Value::String(s)) => Value::String(s.clone()),
        _ => Value::String(default.to_string()),
    }
}

fn detailed_candidate(item: &Value, kind: CandidateKind) -> Value {
    let Some(object) = item.as_object() else {
        let name = match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let mut placeholder = json!({
            "name": name,
            "final_score": 0,
            "vector_score": 0,
            "ai_score": 0,
            "ai_reason": "구조 변환됨",
            "description": "",
            "verification": unverified(),
            "score_breakdown": breakdown(true),
        });
        if let CandidateKind::PastIssue = kind {
            placeholder["period"] = json!("N/A");
        }
        return placeholder;
    };

    let verification = object.get("verification").filter(|v| v.is_object());
    // Only an explicit `is_grounded: false` counts as penalised.
    let penalty_applied = !verification
        .and_then(|v| v.get("is_grounded"))
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let mut detailed = json!({
        "name": text_or(object, "name", kind.missing_name()),
        "final_score": number_or_zero(object, "final_score"),
        "vector_score": number_or_zero(object, "vector_score"),
        "ai_score": number_or_zero(object, "ai_score"),
        "ai_reason": text_or(object, "ai_reason", ""),
        "description": text_or(object, "description", ""),
        "verification": verification.cloned().unwrap_or_else(unverified),
        "score_breakdown": breakdown(penalty_applied),
    });
    if let CandidateKind::PastIssue = kind {
        detailed["period"] = text_or(object, "period", "N/A");
    }
    detailed
}

fn detailed_list(issue: &Map<String, Value>, key: &str, kind: CandidateKind) -> Option<Vec<Value>> {
    issue
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|item| detailed_candidate(item, kind)).collect())
}

fn grounded_count(items: &[Value]) -> usize {
    items
        .iter()
        .filter(|item| item["verification"]["is_grounded"].as_bool().unwrap_or(false))
        .count()
}

fn confidence_scores(value: Option<&Value>) -> (f64, f64) {
    match value {
        Some(Value::Object(object)) => (
            object
                .get("consistency_score")
                .and_then(Value::as_f64)
                .unwrap_or_default(),
            object
                .get("peak_relevance_score")
                .and_then(Value::as_f64)
                .unwrap_or_default(),
        ),
        // stored rows and old files keep a single number
        Some(Value::Number(n)) => {
            let score = n.as_f64().unwrap_or_default();
            (score, score)
        }
        _ => (0.0, 0.0),
    }
}

fn enrich_issue(issue: Value) -> Value {
    let Value::Object(mut object) = issue else {
        return issue;
    };

    let industries = detailed_list(&object, INDUSTRY_KEY, CandidateKind::Industry);
    let past_issues = detailed_list(&object, PAST_ISSUE_KEY, CandidateKind::PastIssue);
    let verified = industries.as_deref().map_or(0, grounded_count)
        + past_issues.as_deref().map_or(0, grounded_count);
    let (consistency, peak) = confidence_scores(object.get(CONFIDENCE_KEY));

    if let Some(industries) = industries {
        object.insert(format!("{INDUSTRY_KEY}_상세"), Value::Array(industries));
    }
    if let Some(past_issues) = past_issues {
        object.insert(format!("{PAST_ISSUE_KEY}_상세"), Value::Array(past_issues));
    }
    object.insert(
        format!("{CONFIDENCE_KEY}_상세"),
        json!({
            "consistency_score": consistency,
            "peak_relevance_score": peak,
            "calculation_method": "평균 일관성 + 최고 연관도",
            "total_verified_items": verified,
        }),
    );
    Value::Object(object)
}

pub fn enrich_with_rag_details(issues: Vec<Value>) -> Vec<Value> {
    issues.into_iter().map(enrich_issue).collect()
}
