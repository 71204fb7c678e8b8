use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::{CrawlError, NewsSource, RawIssue};

pub const DEFAULT_BIGKINDS_URL: &str = "https://www.bigkinds.or.kr";

/// Categories tabbed on the BigKinds issue page, in crawl order.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "정치", "경제", "사회", "문화", "국제", "지역", "스포츠", "IT_과학",
];

/// Where and how to read the BigKinds issue list.
///
/// `issue_path` is appended to `base_url` with `{category}` replaced by the
/// category name. The selectors describe one issue card on that page.
#[derive(Clone, Debug)]
pub struct BigKindsConfig {
    pub base_url: String,
    pub issue_path: String,
    pub item_selector: String,
    pub title_selector: String,
    pub summary_selector: String,
    pub body_selector: Option<String>,
    pub timeout: Duration,
}

impl Default for BigKindsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BIGKINDS_URL.to_string(),
            issue_path: "/v2/news/issueList.do?category={category}".to_string(),
            item_selector: ".issue-item".to_string(),
            title_selector: ".issue-title".to_string(),
            summary_selector: ".issue-summary".to_string(),
            body_selector: Some(".issue-body".to_string()),
            timeout: Duration::from_secs(30),
        }
    }
}

impl BigKindsConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn category_url(&self, category: &str) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.issue_path.replace("{category}", category)
        )
    }
}

struct IssueSelectors {
    item: Selector,
    title: Selector,
    summary: Selector,
    body: Option<Selector>,
}

fn parse_selector(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|err| CrawlError::Selector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

impl IssueSelectors {
    fn compile(config: &BigKindsConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            item: parse_selector(&config.item_selector)?,
            title: parse_selector(&config.title_selector)?,
            summary: parse_selector(&config.summary_selector)?,
            body: config.body_selector.as_deref().map(parse_selector).transpose()?,
        })
    }
}

/// Issue list scraped from bigkinds.or.kr over plain HTTP.
pub struct BigKindsSource {
    http: reqwest::Client,
    config: BigKindsConfig,
    selectors: IssueSelectors,
}

impl BigKindsSource {
    pub fn new(config: BigKindsConfig) -> Result<Self, CrawlError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0 (compatible; orda-crawler)")
            .build()?;
        let selectors = IssueSelectors::compile(&config)?;
        Ok(Self {
            http,
            config,
            selectors,
        })
    }

    /// Extracts issue cards from an already downloaded page.
    pub fn parse_issues(&self, html: &str, limit: usize) -> Vec<RawIssue> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.item)
            .filter_map(|item| self.parse_item(item))
            .take(limit)
            .collect()
    }

    fn parse_item(&self, item: ElementRef<'_>) -> Option<RawIssue> {
        let title = first_text(item, &self.selectors.title)?;
        if title.is_empty() {
            return None;
        }
        let content = first_text(item, &self.selectors.summary).unwrap_or_default();
        let original_content = self
            .selectors
            .body
            .as_ref()
            .and_then(|body| first_text(item, body))
            .filter(|text| !text.is_empty());
        Some(RawIssue {
            title,
            content,
            original_content,
        })
    }
}

fn first_text(item: ElementRef<'_>, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl NewsSource for BigKindsSource {
    async fn fetch_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<RawIssue>, CrawlError> {
        let url = self.config.category_url(category);
        tracing::debug!(%url, category, "fetching issue page");
        let html = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let issues = self.parse_issues(&html, limit);
        tracing::info!(category, count = issues.len(), "issues parsed");
        Ok(issues)
    }
}
