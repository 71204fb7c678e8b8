//! CSV reference data: the KRX industry table and the curated past-issue
//! list. Both feed the search endpoints and the vector index.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::RagError;

pub const INDUSTRY_CSV: &str = "산업DB.v.0.3.csv";
pub const PAST_NEWS_CSV: &str = "Past_news.csv";
const PAST_NEWS_SOURCE: &str = "과거 이슈 DB";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndustryRecord {
    /// Row position in the CSV, used for vector ids.
    #[serde(skip)]
    pub row: usize,
    pub krx_name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PastNewsRecord {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub start_date: String,
    pub end_date: String,
    pub evidence_source: String,
    /// The `카테고리` column.
    pub related_industries: String,
    /// The `관련 산업` column.
    #[serde(skip)]
    pub industry_tags: String,
    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PastNewsPage {
    pub total: usize,
    pub data: Vec<PastNewsRecord>,
}

struct CsvTable {
    path: String,
    columns: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl CsvTable {
    fn read(path: &Path) -> Result<Self, RagError> {
        let display = path.display().to_string();
        let wrap = |source: csv::Error| RagError::Csv {
            path: display.clone(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(wrap)?;
        let columns = reader
            .headers()
            .map_err(wrap)?
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), idx))
            .collect();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;
        Ok(Self {
            path: display,
            columns,
            rows,
        })
    }

    fn require(&self, column: &str) -> Result<usize, RagError> {
        self.columns
            .get(column)
            .copied()
            .ok_or_else(|| RagError::MissingColumn {
                path: self.path.clone(),
                column: column.to_string(),
            })
    }

    fn cell(&self, row: &csv::StringRecord, column: &str) -> String {
        self.columns
            .get(column)
            .and_then(|&idx| row.get(idx))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

fn load_industries(path: &Path) -> Result<Vec<IndustryRecord>, RagError> {
    let table = CsvTable::read(path)?;
    table.require("KRX 업종명")?;
    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(row, record)| {
            let krx_name = table.cell(record, "KRX 업종명");
            (!krx_name.is_empty()).then(|| IndustryRecord {
                row,
                krx_name,
                description: table.cell(record, "상세내용"),
            })
        })
        .collect())
}

fn load_past_news(path: &Path) -> Result<Vec<PastNewsRecord>, RagError> {
    let table = CsvTable::read(path)?;
    table.require("ID")?;
    table.require("Issue_name")?;
    let mut records: Vec<(usize, PastNewsRecord)> = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, record)| (row, PastNewsRecord {
            id: table.cell(record, "ID"),
            title: table.cell(record, "Issue_name"),
            summary: table.cell(record, "Contents"),
            content: table.cell(record, "Contentes(Spec)"),
            start_date: table.cell(record, "Start_date"),
            end_date: table.cell(record, "Fin_date"),
            evidence_source: table.cell(record, "근거자료"),
            related_industries: table.cell(record, "카테고리"),
            industry_tags: table.cell(record, "관련 산업"),
            source: PAST_NEWS_SOURCE.to_string(),
        }))
        .filter(|(_, record)| !record.id.is_empty())
        .collect();

    // Duplicates are renumbered by CSV row, blank-ID rows still count.
    let mut seen = HashSet::new();
    if !records.iter().all(|(_, r)| seen.insert(r.id.clone())) {
        for (row, record) in records.iter_mut() {
            record.id = row.to_string();
        }
    }
    Ok(records.into_iter().map(|(_, record)| record).collect())
}

/// Both reference tables, loaded once at startup.
#[derive(Clone, Debug, Default)]
pub struct ReferenceData {
    pub industries: Vec<IndustryRecord>,
    pub past_news: Vec<PastNewsRecord>,
}

impl ReferenceData {
    pub fn load(industry_csv: &Path, past_news_csv: &Path) -> Result<Self, RagError> {
        let industries = load_industries(industry_csv)?;
        let past_news = load_past_news(past_news_csv)?;
        tracing::info!(
            industries = industries.len(),
            past_news = past_news.len(),
            "reference data loaded"
        );
        Ok(Self {
            industries,
            past_news,
        })
    }

    /// Loads `산업DB.v.0.3.csv` and `Past_news.csv` from `data_dir`.
    pub fn load_dir(data_dir: &Path) -> Result<Self, RagError> {
        Self::load(&data_dir.join(INDUSTRY_CSV), &data_dir.join(PAST_NEWS_CSV))
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty() && self.past_news.is_empty()
    }

    /// Case-insensitive keyword match on title or summary, then an exact
    /// substring match on the category column.
    pub fn search_past_issues(
        &self,
        limit: usize,
        search: Option<&str>,
        industry: Option<&str>,
    ) -> PastNewsPage {
        let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
        let matches: Vec<&PastNewsRecord> = self
            .past_news
            .iter()
            .filter(|r| {
                needle.as_deref().map_or(true, |n| {
                    r.title.to_lowercase().contains(n) || r.summary.to_lowercase().contains(n)
                })
            })
            .filter(|r| {
                industry
                    .filter(|i| !i.is_empty())
                    .map_or(true, |i| r.related_industries.contains(i))
            })
            .collect();
        PastNewsPage {
            total: matches.len(),
            data: matches.into_iter().take(limit).cloned().collect(),
        }
    }

    pub fn search_industries(&self, search: Option<&str>, limit: usize) -> Vec<IndustryRecord> {
        let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
        self.industries
            .iter()
            .filter(|r| {
                needle.as_deref().map_or(true, |n| {
                    r.krx_name.to_lowercase().contains(n)
                        || r.description.to_lowercase().contains(n)
                })
            })
            .take(limit)
            .cloned()
            .collect()
    }
}
