use chrono::NaiveDate;
use orda_store::{
    InMemoryIssueStore, IssueRepository, NewIssue, NewRelation, PipelineLogEntry,
    PipelineSnapshot, SimulationRecord,
};

fn relation(name: &str, score: f64) -> NewRelation {
    NewRelation {
        name: name.to_string(),
        final_score: score,
        period: None,
        ai_reason: format!("{name} 관련"),
    }
}

fn issue(number: i32, ranking: i32) -> NewIssue {
    NewIssue {
        issue_number: number,
        title: format!("이슈 {number}"),
        content: "내용".to_string(),
        category: "경제".to_string(),
        extracted_at: NaiveDate::from_ymd_opt(2025, 7, 1).and_then(|d| d.and_hms_opt(9, 0, 0)),
        stock_relevance_score: 7.5,
        ranking,
        rag_confidence: 6.2,
        industries: vec![relation("은행", 4.0), relation("반도체", 8.1)],
        past_issues: vec![NewRelation {
            period: Some("2008-09-15 ~ 2009-03-31".to_string()),
            ..relation("글로벌 금융위기", 7.0)
        }],
    }
}

fn snapshot(pipeline_id: &str, issues: Vec<NewIssue>) -> PipelineSnapshot {
    PipelineSnapshot {
        log: PipelineLogEntry {
            pipeline_id: pipeline_id.to_string(),
            started_at: None,
            completed_at: None,
            final_status: "success".to_string(),
            total_crawled: 50,
            selected_count: issues.len() as i32,
        },
        issues,
    }
}

#[tokio::test]
async fn latest_issues_are_ordered_by_ranking_with_sorted_relations() {
    let store = InMemoryIssueStore::new();
    store
        .save_pipeline_result(snapshot("20250701_090000", vec![issue(7, 2), issue(3, 1)]))
        .await
        .unwrap();

    let issues = store.latest_issues().await.unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].issue_number, Some(3));
    assert_eq!(issues[1].issue_number, Some(7));
    assert_eq!(
        issues[0].related_industries[0].industry_name.as_deref(),
        Some("반도체")
    );
    assert_eq!(
        issues[0].related_past_issues[0].period.as_deref(),
        Some("2008-09-15 ~ 2009-03-31")
    );

    let fetched = store.issue_with_relations(issues[1].id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "이슈 7");
}

#[tokio::test]
async fn saving_replaces_issues_but_keeps_logs() {
    let store = InMemoryIssueStore::new();
    store
        .save_pipeline_result(snapshot("first", vec![issue(1, 1), issue(2, 2)]))
        .await
        .unwrap();
    store
        .save_pipeline_result(snapshot("second", vec![issue(9, 1)]))
        .await
        .unwrap();

    let issues = store.latest_issues().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_number, Some(9));

    let log = store.latest_pipeline_log().await.unwrap().unwrap();
    assert_eq!(log.pipeline_id.as_deref(), Some("second"));
    assert_eq!(log.id, 2);
}

#[tokio::test]
async fn titles_are_truncated_to_column_width() {
    let store = InMemoryIssueStore::new();
    let mut long = issue(1, 1);
    long.title = "가".repeat(600);
    store
        .save_pipeline_result(snapshot("p", vec![long]))
        .await
        .unwrap();

    let issues = store.latest_issues().await.unwrap();
    assert_eq!(issues[0].title.chars().count(), 500);
}

#[tokio::test]
async fn stats_count_issues_and_simulations() {
    let store = InMemoryIssueStore::new();
    store
        .save_pipeline_result(snapshot("p", vec![issue(1, 1)]))
        .await
        .unwrap();
    store
        .record_simulation(SimulationRecord {
            issue_name: "코로나19 팬데믹".to_string(),
            total_investment: 1_000_000,
            total_final_value: 1_100_000.0,
            total_profit_loss: 100_000.0,
            prediction_accuracy: 75.0,
        })
        .await
        .unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.current_issues, 1);
    assert_eq!(stats.simulation_results, 1);
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
async fn empty_store_has_no_log() {
    let store = InMemoryIssueStore::new();
    assert!(store.latest_pipeline_log().await.unwrap().is_none());
    assert!(store.latest_issues().await.unwrap().is_empty());
}

#[test]
fn whole_won_rejects_amounts_outside_bigint() {
    assert_eq!(SimulationRecord::whole_won(1_000_000.4), Some(1_000_000));
    assert_eq!(SimulationRecord::whole_won(-2.5), Some(-3));
    assert_eq!(SimulationRecord::whole_won(1e19), None);
    assert_eq!(SimulationRecord::whole_won(i64::MAX as f64), None);
    assert_eq!(SimulationRecord::whole_won(f64::INFINITY), None);
    assert_eq!(SimulationRecord::whole_won(f64::NAN), None);
}
