//! Conversions between pipeline output and the issue repository.

use chrono::{DateTime, Local, NaiveDateTime};
use orda_core::round_to;
use orda_rag::Candidate;
use orda_store::{NewIssue, NewRelation, PipelineLogEntry, PipelineSnapshot, StoredIssue};
use serde_json::{json, Value};

use crate::{ApiIssue, PipelineRun};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_display_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT).ok()
}

/// `추출시간` is ISO-8601, with or without an offset. Unparseable values
/// fall back to the current time.
fn parse_extracted_at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .unwrap_or_else(|| Local::now().naive_local())
}

fn relation(candidate: &Candidate) -> NewRelation {
    NewRelation {
        name: candidate.name.clone(),
        final_score: round_to(candidate.final_score, 1),
        period: candidate.period.clone(),
        ai_reason: candidate.ai_reason.clone(),
    }
}

fn new_issue(issue: &ApiIssue) -> NewIssue {
    NewIssue {
        issue_number: issue.issue_number as i32,
        title: issue.title.clone(),
        content: issue.content.clone(),
        category: issue.category.clone(),
        extracted_at: Some(parse_extracted_at(&issue.extracted_at)),
        stock_relevance_score: round_to(issue.stock_relevance_score, 1),
        ranking: issue.rank as i32,
        rag_confidence: round_to(issue.confidence.consistency_score, 1),
        industries: issue.industries.iter().map(relation).collect(),
        past_issues: issue.past_issues.iter().map(relation).collect(),
    }
}

/// Rows written for one successful run.
pub fn snapshot_from_run(run: &PipelineRun) -> PipelineSnapshot {
    let data = &run.api_ready_data.data;
    PipelineSnapshot {
        issues: data.selected_issues.iter().map(new_issue).collect(),
        log: PipelineLogEntry {
            pipeline_id: run.pipeline_id.clone(),
            started_at: parse_display_time(&run.started_at),
            completed_at: parse_display_time(&run.completed_at),
            final_status: run.final_status.clone(),
            total_crawled: data.total_crawled as i32,
            selected_count: data.selected_count as i32,
        },
    }
}

fn iso(value: Option<NaiveDateTime>) -> Value {
    value
        .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
        .unwrap_or(Value::Null)
}

/// A stored issue in the same shape as the file-backed API issues.
///
/// Only the consistency score survives storage, so `RAG분석신뢰도` is the
/// legacy single number.
pub fn stored_issue_to_api(issue: &StoredIssue) -> Value {
    let industries: Vec<Value> = issue
        .related_industries
        .iter()
        .map(|r| {
            json!({
                "name": r.industry_name.clone().unwrap_or_default(),
                "final_score": r.final_score.unwrap_or_default(),
                "ai_reason": r.ai_reason.clone().unwrap_or_default(),
            })
        })
        .collect();
    let past_issues: Vec<Value> = issue
        .related_past_issues
        .iter()
        .map(|r| {
            json!({
                "name": r.issue_name.clone().unwrap_or_default(),
                "final_score": r.final_score.unwrap_or_default(),
                "period": r.period.clone().unwrap_or_default(),
                "ai_reason": r.ai_reason.clone().unwrap_or_default(),
            })
        })
        .collect();

    json!({
        "id": issue.id,
        "이슈번호": issue.issue_number.unwrap_or_default(),
        "제목": issue.title,
        "내용": issue.content.clone().unwrap_or_default(),
        "카테고리": issue.category.clone().unwrap_or_default(),
        "추출시간": iso(issue.extracted_at),
        "주식시장_관련성_점수": issue.stock_relevance_score.unwrap_or_default(),
        "순위": issue.ranking.unwrap_or_default(),
        "관련산업": industries,
        "관련과거이슈": past_issues,
        "RAG분석신뢰도": issue.rag_confidence.unwrap_or_default(),
        "updated_at": iso(issue.updated_at),
    })
}
