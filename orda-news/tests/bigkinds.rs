use orda_news::{BigKindsConfig, BigKindsSource, NewsSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"
<html><body>
  <ul>
    <li class="issue-item">
      <span class="issue-title">  반도체   수출
        급증 </span>
      <p class="issue-summary">수출이 <b>역대 최대</b>를 기록했다.</p>
      <div class="issue-body">전문 기사 본문</div>
    </li>
    <li class="issue-item">
      <span class="issue-title">   </span>
      <p class="issue-summary">제목 없는 이슈</p>
    </li>
    <li class="issue-item">
      <span class="issue-title">기준금리 동결</span>
      <p class="issue-summary">한국은행이 금리를 동결했다.</p>
    </li>
    <li class="issue-item">
      <span class="issue-title">환율 급등</span>
    </li>
  </ul>
</body></html>
"#;

#[tokio::test]
async fn parses_issue_cards_from_category_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/news/issueList.do"))
        .and(query_param("category", "경제"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let source =
        BigKindsSource::new(BigKindsConfig::default().with_base_url(server.uri())).unwrap();
    let issues = source.fetch_category("경제", 2).await.unwrap();

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].title, "반도체 수출 급증");
    assert_eq!(issues[0].content, "수출이 역대 최대를 기록했다.");
    assert_eq!(issues[0].original_content.as_deref(), Some("전문 기사 본문"));
    assert_eq!(issues[1].title, "기준금리 동결");
    assert_eq!(issues[1].original_content, None);
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source =
        BigKindsSource::new(BigKindsConfig::default().with_base_url(server.uri())).unwrap();
    assert!(source.fetch_category("정치", 10).await.is_err());
}

#[test]
fn invalid_selector_is_rejected() {
    let config = BigKindsConfig {
        item_selector: "li[".to_string(),
        ..BigKindsConfig::default()
    };
    assert!(BigKindsSource::new(config).is_err());
}

#[test]
fn missing_summary_yields_empty_content() {
    let source = BigKindsSource::new(BigKindsConfig::default()).unwrap();
    let issues = source.parse_issues(PAGE, 10);
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[2].title, "환율 급등");
    assert_eq!(issues[2].content, "");
}
