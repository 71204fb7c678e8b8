//! Timestamped JSON result files shared by the crawl, filter and pipeline
//! steps.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::CrawlError;

/// `2025.07.01_09.30.00`, the prefix of every result file name.
pub fn file_timestamp() -> String {
    Local::now().format("%Y.%m.%d_%H.%M.%S").to_string()
}

/// ISO-8601 local time without offset, as stored in `추출시간`.
pub fn iso_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// `2025-07-01 09:30:00`
pub fn display_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Writes pretty JSON with non-ASCII text kept as-is, creating `dir` when
/// needed.
pub async fn write_json<T: Serialize>(
    dir: &Path,
    filename: &str,
    value: &T,
) -> Result<PathBuf, CrawlError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(&path, body).await?;
    tracing::info!(path = %path.display(), "result file saved");
    Ok(path)
}
