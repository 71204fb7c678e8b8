//! `*_Pipeline_Results.json` files: the pipeline's durable output and the
//! fallback source for the issue endpoints when the database is empty.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use orda_news::output::{file_timestamp, iso_now, write_json};
use orda_news::CrawlError;
use orda_rag::EnrichedIssue;
use serde_json::Value;

use crate::{
    PipelineError, PipelineResultFile, PipelineRun, ResultFileInfo, ResultFileStatus,
    ResultPipelineMetadata,
};

pub const RESULT_FILE_SUFFIX: &str = "_Pipeline_Results.json";
pub const FORMAT_VERSION: &str = "2.0";
const PIPELINE_VERSION: &str = "PipelineService_v2.0";

pub async fn save_pipeline_result(
    dir: &Path,
    run: &PipelineRun,
    issues: &[EnrichedIssue],
) -> Result<PathBuf, CrawlError> {
    let filename = format!("{}{RESULT_FILE_SUFFIX}", file_timestamp());
    let body = PipelineResultFile {
        timestamp: iso_now(),
        total_issues: issues.len(),
        selected_issues: issues.to_vec(),
        average_confidence: run.rag_result.average_confidence,
        processing_time: run.execution_time.clone(),
        pipeline_metadata: ResultPipelineMetadata {
            pipeline_id: run.pipeline_id.clone(),
            steps_completed: run.steps_completed.clone(),
            final_status: run.final_status.clone(),
            version: PIPELINE_VERSION.to_string(),
        },
        file_info: ResultFileInfo {
            filename: filename.clone(),
            created_at: iso_now(),
            format_version: FORMAT_VERSION.to_string(),
        },
    };
    write_json(dir, &filename, &body).await
}

/// Newest result file in `dir` by modification time, `None` when the
/// directory is missing or holds no results.
pub async fn latest_result_file(dir: &Path) -> Result<Option<PathBuf>, PipelineError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut newest: Option<(SystemTime, String, PathBuf)> = None;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(RESULT_FILE_SUFFIX) {
            continue;
        }
        let modified = entry.metadata().await?.modified()?;
        let candidate = (modified, name, entry.path());
        if newest
            .as_ref()
            .map_or(true, |(t, n, _)| (&candidate.0, &candidate.1) > (t, n))
        {
            newest = Some(candidate);
        }
    }
    Ok(newest.map(|(_, _, path)| path))
}

async fn read_value(path: &Path) -> Result<Value, PipelineError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Issues stored in a result file, accepting both the current layout and
/// the older `api_ready_data.data.selected_issues` one.
pub fn issues_from_value(value: &Value) -> Vec<Value> {
    let issues = value
        .get("selected_issues")
        .or_else(|| value.pointer("/api_ready_data/data/selected_issues"));
    match issues {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

pub async fn read_result_issues(path: &Path) -> Result<Vec<Value>, PipelineError> {
    Ok(issues_from_value(&read_value(path).await?))
}

pub async fn latest_file_issues(dir: &Path) -> Result<Vec<Value>, PipelineError> {
    match latest_result_file(dir).await? {
        Some(path) => {
            let issues = read_result_issues(&path).await?;
            tracing::debug!(path = %path.display(), count = issues.len(), "issues read from result file");
            Ok(issues)
        }
        None => Ok(Vec::new()),
    }
}

pub async fn latest_file_status(dir: &Path) -> Result<Option<ResultFileStatus>, PipelineError> {
    let Some(path) = latest_result_file(dir).await? else {
        return Ok(None);
    };
    let value = read_value(&path).await?;
    let text = |pointer: &str| {
        value
            .pointer(pointer)
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    };
    Ok(Some(ResultFileStatus {
        last_execution: text("/pipeline_metadata/pipeline_id"),
        status: text("/pipeline_metadata/final_status"),
        file_path: path.display().to_string(),
        issues_count: value
            .get("total_issues")
            .and_then(Value::as_u64)
            .unwrap_or_default(),
        average_confidence: value
            .get("average_confidence")
            .and_then(Value::as_f64)
            .unwrap_or_default(),
    }))
}
