use std::sync::Arc;

use orda_core::{LlmRequest, LlmResponse, OrdaError, Runnable};
use orda_llm::Llm;
use orda_news::{CrawledIssue, RelevanceAnalysis, StockRelevanceFilter};

/// Scores each issue by looking for a `score=N` marker in its title.
struct MarkerLlm;

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for MarkerLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, OrdaError> {
        let human = &input.messages[1].content;
        if human.contains("broken") {
            return Err(OrdaError::LlmProvider("upstream 500".to_string()));
        }
        let score = human
            .split("score=")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap_or("1");
        Ok(LlmResponse {
            content: format!(
                r#"{{"직접적_기업영향": {score}, "종합점수": "{score}", "주된영향분야": ["반도체"]}}"#
            ),
        })
    }
}

fn issue(number: u32, title: &str) -> CrawledIssue {
    CrawledIssue {
        issue_number: number,
        category: "경제".to_string(),
        title: title.to_string(),
        content: "요약".to_string(),
        extracted_at: "2025-07-01T09:00:00.000000".to_string(),
        original_content: None,
    }
}

#[tokio::test]
async fn keeps_top_scored_issues_in_rank_order() {
    let dir = tempfile::tempdir().unwrap();
    let llm: Arc<dyn Llm> = Arc::new(MarkerLlm);
    let filter = StockRelevanceFilter::new(llm, dir.path());

    let issues = vec![
        issue(1, "금리 score=6"),
        issue(2, "반도체 score=9"),
        issue(3, "날씨 score=2"),
        issue(4, "환율 score=6"),
    ];
    let result = filter.filter(&issues, 3).await.unwrap();

    let numbers: Vec<u32> = result
        .selected_issues
        .iter()
        .map(|i| i.issue.issue_number)
        .collect();
    assert_eq!(numbers, vec![2, 1, 4]);
    let ranks: Vec<Option<u32>> = result.selected_issues.iter().map(|i| i.rank).collect();
    assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);

    let meta = &result.filter_metadata;
    assert_eq!(meta.filtering_method, "gpt-4o-mini_stock_relevance");
    assert_eq!(meta.original_count, 4);
    assert_eq!(meta.selected_count, 3);
    assert_eq!(meta.average_score, Some(7.0));

    let saved: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].ends_with("_StockFiltered_3issues.json"));

    let body: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join(&saved[0])).unwrap()).unwrap();
    assert_eq!(
        body["file_info"]["filter_version"],
        "StockRelevanceFilter_v2.0_WithReasons"
    );
    assert_eq!(body["selected_issues"][0]["제목"], "반도체 score=9");
    assert_eq!(body["selected_issues"][0]["주식시장_관련성_점수"], 9.0);
}

#[tokio::test]
async fn missing_fields_take_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let filter = StockRelevanceFilter::new(Arc::new(MarkerLlm), dir.path());

    let analysis = filter.analyze(&issue(1, "score=8")).await;
    assert_eq!(analysis.total_score, 8.0);
    assert_eq!(analysis.policy, 5.0);
    assert_eq!(analysis.policy_reason, "분석 근거 미제공");
    assert_eq!(analysis.expected_direction, "중립적");
    assert_eq!(analysis.impact_timing, "단기");
    assert_eq!(analysis.total_score_method, "AI 자체 계산");
    assert_eq!(analysis.main_sectors, vec!["반도체".to_string()]);
}

#[tokio::test]
async fn failed_analysis_falls_back_to_neutral_scores() {
    let dir = tempfile::tempdir().unwrap();
    let filter = StockRelevanceFilter::new(Arc::new(MarkerLlm), dir.path());

    let analysis = filter.analyze(&issue(1, "broken")).await;
    assert_eq!(analysis.total_score, 5.0);
    assert_eq!(analysis.total_score_method, "오류로 인한 기본값");
    assert!(analysis.reasoning.starts_with("AI 분석 실패: "));
    assert!(analysis.direct_corporate_reason.contains("upstream 500"));
}

#[tokio::test]
async fn empty_input_is_reported_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let filter = StockRelevanceFilter::new(Arc::new(MarkerLlm), dir.path());

    let result = filter.filter(&[], 5).await.unwrap();
    assert!(result.selected_issues.is_empty());
    assert_eq!(result.filter_metadata.filtering_method, "no_issues_to_filter");
    assert_eq!(result.filter_metadata.average_score, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn analysis_keys_are_korean() {
    let json = serde_json::to_value(RelevanceAnalysis::fallback("x")).unwrap();
    assert_eq!(json["종합점수"], 5.0);
    assert_eq!(json["종합점수_계산방식"], "오류로 인한 기본값");
    assert_eq!(json["예상영향방향"], "중립적");
}

#[test]
fn non_finite_scores_fall_back_to_neutral() {
    for raw in ["NaN", "inf", "-infinity", "1e400"] {
        let json = format!(r#"{{"종합점수": "{raw}", "정책적_영향": " 7 "}}"#);
        let analysis: RelevanceAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis.total_score, 5.0, "{raw}");
        assert_eq!(analysis.policy, 7.0);
    }
}
