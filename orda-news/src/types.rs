use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::CrawlError;

/// An issue as scraped, before numbering.
#[derive(Clone, Debug, PartialEq)]
pub struct RawIssue {
    pub title: String,
    pub content: String,
    pub original_content: Option<String>,
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_category(&self, category: &str, limit: usize)
        -> Result<Vec<RawIssue>, CrawlError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrawledIssue {
    #[serde(rename = "이슈번호")]
    pub issue_number: u32,
    #[serde(rename = "카테고리")]
    pub category: String,
    #[serde(rename = "제목")]
    pub title: String,
    #[serde(rename = "내용")]
    pub content: String,
    #[serde(rename = "추출시간")]
    pub extracted_at: String,
    #[serde(rename = "원본내용", default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
}

impl CrawledIssue {
    /// Full article text when the crawler kept it, the summary otherwise.
    pub fn body(&self) -> &str {
        match self.original_content.as_deref() {
            Some(original) if !original.trim().is_empty() => original,
            _ => &self.content,
        }
    }
}

pub(crate) const MISSING_REASON: &str = "분석 근거 미제공";
const DEFAULT_SCORE: f64 = 5.0;

fn default_score() -> f64 {
    DEFAULT_SCORE
}

fn default_reason() -> String {
    MISSING_REASON.to_string()
}

fn default_method() -> String {
    "AI 자체 계산".to_string()
}

fn default_direction() -> String {
    "중립적".to_string()
}

fn default_timing() -> String {
    "단기".to_string()
}

fn default_summary() -> String {
    "AI 분석 완료".to_string()
}

// Models occasionally quote numbers ("7") or send null.
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    // "NaN" and "inf" parse as floats but cannot be ranked.
    Ok(score.filter(|v| v.is_finite()).unwrap_or(DEFAULT_SCORE))
}

/// The model's five-dimension stock-market relevance assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelevanceAnalysis {
    #[serde(rename = "직접적_기업영향", default = "default_score", deserialize_with = "lenient_score")]
    pub direct_corporate: f64,
    #[serde(rename = "직접적_기업영향_근거", default = "default_reason")]
    pub direct_corporate_reason: String,
    #[serde(rename = "정책적_영향", default = "default_score", deserialize_with = "lenient_score")]
    pub policy: f64,
    #[serde(rename = "정책적_영향_근거", default = "default_reason")]
    pub policy_reason: String,
    #[serde(rename = "시장_심리_영향", default = "default_score", deserialize_with = "lenient_score")]
    pub market_sentiment: f64,
    #[serde(rename = "시장_심리_영향_근거", default = "default_reason")]
    pub market_sentiment_reason: String,
    #[serde(rename = "거시경제_영향", default = "default_score", deserialize_with = "lenient_score")]
    pub macroeconomic: f64,
    #[serde(rename = "거시경제_영향_근거", default = "default_reason")]
    pub macroeconomic_reason: String,
    #[serde(rename = "산업_트렌드_영향", default = "default_score", deserialize_with = "lenient_score")]
    pub industry_trend: f64,
    #[serde(rename = "산업_트렌드_영향_근거", default = "default_reason")]
    pub industry_trend_reason: String,
    #[serde(rename = "종합점수", default = "default_score", deserialize_with = "lenient_score")]
    pub total_score: f64,
    #[serde(rename = "종합점수_계산방식", default = "default_method")]
    pub total_score_method: String,
    #[serde(rename = "주된영향분야", default)]
    pub main_sectors: Vec<String>,
    #[serde(rename = "예상영향방향", default = "default_direction")]
    pub expected_direction: String,
    #[serde(rename = "영향시기", default = "default_timing")]
    pub impact_timing: String,
    #[serde(rename = "분석근거", default = "default_summary")]
    pub reasoning: String,
    #[serde(rename = "예상시장반응", default)]
    pub expected_market_reaction: String,
}

impl RelevanceAnalysis {
    /// Neutral scores recorded when the model call or its parsing fails.
    pub fn fallback(error: &str) -> Self {
        let reason = format!("AI 분석 실패: {error}");
        Self {
            direct_corporate: DEFAULT_SCORE,
            direct_corporate_reason: reason.clone(),
            policy: DEFAULT_SCORE,
            policy_reason: reason.clone(),
            market_sentiment: DEFAULT_SCORE,
            market_sentiment_reason: reason.clone(),
            macroeconomic: DEFAULT_SCORE,
            macroeconomic_reason: reason.clone(),
            industry_trend: DEFAULT_SCORE,
            industry_trend_reason: reason.clone(),
            total_score: DEFAULT_SCORE,
            total_score_method: "오류로 인한 기본값".to_string(),
            main_sectors: Vec::new(),
            expected_direction: default_direction(),
            impact_timing: default_timing(),
            reasoning: reason,
            expected_market_reaction: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredIssue {
    #[serde(flatten)]
    pub issue: CrawledIssue,
    #[serde(rename = "주식시장_관련성_점수")]
    pub stock_relevance_score: f64,
    #[serde(rename = "관련성_분석")]
    pub analysis: RelevanceAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrawlMetadata {
    pub timestamp: String,
    pub categories_processed: Vec<String>,
    #[serde(default)]
    pub failed_categories: Vec<String>,
    pub issues_per_category: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub all_issues: Vec<CrawledIssue>,
    pub total_issues: usize,
    pub crawling_metadata: CrawlMetadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterMetadata {
    pub filtering_method: String,
    pub original_count: usize,
    pub selected_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    pub filtered_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub selected_issues: Vec<ScoredIssue>,
    pub filter_metadata: FilterMetadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrawlAndFilterResult {
    #[serde(flatten)]
    pub crawl: CrawlResult,
    pub filtered_issues: Vec<ScoredIssue>,
    pub filter_metadata: FilterMetadata,
}
