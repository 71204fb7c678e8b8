use std::path::PathBuf;
use std::sync::Arc;

use crate::output::{display_now, file_timestamp, iso_now, write_json};
use crate::{CrawlError, CrawlMetadata, CrawlResult, CrawledIssue, NewsSource};

/// Walks every category of a [`NewsSource`] and numbers the issues it finds.
pub struct Crawler {
    source: Arc<dyn NewsSource>,
    categories: Vec<String>,
    issues_per_category: usize,
    data_dir: PathBuf,
}

impl Crawler {
    pub fn new(
        source: Arc<dyn NewsSource>,
        categories: Vec<String>,
        issues_per_category: usize,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            categories,
            issues_per_category,
            data_dir: data_dir.into(),
        }
    }

    /// Crawls all categories, skipping the ones that fail, and saves the
    /// combined list as `{ts}_AllCategories_{n}issues.json`.
    pub async fn crawl_all_categories(&self) -> Result<CrawlResult, CrawlError> {
        let mut all_issues = Vec::new();
        let mut processed = Vec::new();
        let mut failed = Vec::new();

        for category in &self.categories {
            match self
                .source
                .fetch_category(category, self.issues_per_category)
                .await
            {
                Ok(raw) => {
                    let extracted_at = iso_now();
                    for item in raw.into_iter().take(self.issues_per_category) {
                        all_issues.push(CrawledIssue {
                            issue_number: all_issues.len() as u32 + 1,
                            category: category.clone(),
                            title: item.title,
                            content: item.content,
                            extracted_at: extracted_at.clone(),
                            original_content: item.original_content,
                        });
                    }
                    processed.push(category.clone());
                }
                Err(err) => {
                    tracing::error!(%category, error = %err, "category crawl failed, skipping");
                    failed.push(category.clone());
                }
            }
        }

        let result = CrawlResult {
            total_issues: all_issues.len(),
            all_issues,
            crawling_metadata: CrawlMetadata {
                timestamp: display_now(),
                categories_processed: processed,
                failed_categories: failed,
                issues_per_category: self.issues_per_category,
            },
        };

        let filename = format!(
            "{}_AllCategories_{}issues.json",
            file_timestamp(),
            result.total_issues
        );
        write_json(&self.data_dir, &filename, &result).await?;
        tracing::info!(total = result.total_issues, "crawl finished");
        Ok(result)
    }
}
