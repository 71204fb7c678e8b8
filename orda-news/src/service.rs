use std::path::PathBuf;
use std::sync::Arc;

use orda_llm::Llm;

use crate::{
    CrawlAndFilterResult, CrawlError, Crawler, NewsSource, StockRelevanceFilter,
};

/// Crawl followed by the relevance filter, writing both result files to
/// the same directory.
pub struct CrawlingService {
    source: Arc<dyn NewsSource>,
    categories: Vec<String>,
    data_dir: PathBuf,
    filter: StockRelevanceFilter,
}

impl CrawlingService {
    pub fn new(
        source: Arc<dyn NewsSource>,
        llm: Arc<dyn Llm>,
        categories: Vec<String>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            source,
            categories,
            filter: StockRelevanceFilter::new(llm, data_dir.clone()),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }

    pub async fn crawl_and_filter_news(
        &self,
        issues_per_category: usize,
        target_filtered_count: usize,
    ) -> Result<CrawlAndFilterResult, CrawlError> {
        tracing::info!(issues_per_category, "crawling started");
        let crawler = Crawler::new(
            self.source.clone(),
            self.categories.clone(),
            issues_per_category,
            self.data_dir.clone(),
        );
        let crawl = crawler.crawl_all_categories().await?;
        let filtered = self
            .filter
            .filter(&crawl.all_issues, target_filtered_count)
            .await?;
        Ok(CrawlAndFilterResult {
            crawl,
            filtered_issues: filtered.selected_issues,
            filter_metadata: filtered.filter_metadata,
        })
    }
}
