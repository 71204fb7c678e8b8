use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::persist::snapshot_from_run;
use crate::{PipelineRun, PipelineService};

/// Clears the running flag however the run ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Periodic pipeline runs that never overlap.
pub struct BackgroundPipeline {
    pipeline: Arc<PipelineService>,
    issues_per_category: usize,
    target_filtered_count: usize,
    running: AtomicBool,
}

impl BackgroundPipeline {
    pub fn new(
        pipeline: Arc<PipelineService>,
        issues_per_category: usize,
        target_filtered_count: usize,
    ) -> Self {
        Self {
            pipeline,
            issues_per_category,
            target_filtered_count,
            running: AtomicBool::new(false),
        }
    }

    pub fn pipeline(&self) -> &Arc<PipelineService> {
        &self.pipeline
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// One run, persisted to the repository when there is one. Returns
    /// `None` when skipped because another run is in progress, or on
    /// failure.
    pub async fn run_once(&self) -> Option<PipelineRun> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("pipeline already running, skipping");
            return None;
        }
        let _guard = RunGuard(&self.running);

        let run = match self
            .pipeline
            .execute_full_pipeline(self.issues_per_category, self.target_filtered_count)
            .await
        {
            Ok(run) => run,
            Err(err) => {
                let step = err.step().map(|s| s.as_str()).unwrap_or("unknown");
                tracing::error!(step, error = %err, "background pipeline failed");
                return None;
            }
        };

        if let Some(repository) = self.pipeline.repository() {
            match repository.save_pipeline_result(snapshot_from_run(&run)).await {
                Ok(saved) => tracing::info!(saved, "pipeline result stored"),
                Err(err) => {
                    tracing::warn!(error = %err, "database save failed, result file kept")
                }
            }
        }

        let details = run.final_summary.processing_details;
        tracing::info!(
            pipeline_id = %run.pipeline_id,
            saved_file = %run.saved_file,
            crawled = details.crawled,
            filtered = details.filtered,
            analyzed = details.analyzed,
            average_confidence = run.final_summary.average_confidence,
            "background pipeline finished"
        );
        Some(run)
    }

    /// Runs immediately, then on every `interval` until `cancel` fires.
    pub async fn run_scheduled(self: Arc<Self>, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval_secs = interval.as_secs(), "pipeline scheduler started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
        tracing::info!("pipeline scheduler stopped");
    }
}
