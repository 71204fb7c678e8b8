use std::path::PathBuf;
use std::sync::Arc;

use orda_pipeline::BackgroundPipeline;
use orda_rag::{RagService, ReferenceData};
use orda_simulation::SimulationService;
use orda_store::IssueRepository;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn IssueRepository>,
    pub reference: Arc<ReferenceData>,
    pub simulation: Arc<SimulationService>,
    /// `None` when the vector index could not be opened.
    pub rag: Option<Arc<RagService>>,
    /// `None` when the server runs without a pipeline.
    pub pipeline: Option<Arc<BackgroundPipeline>>,
    pub results_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn IssueRepository>,
        reference: Arc<ReferenceData>,
        simulation: Arc<SimulationService>,
        results_dir: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            reference,
            simulation,
            rag: None,
            pipeline: None,
            results_dir: results_dir.into(),
            static_dir: static_dir.into(),
        }
    }

    pub fn with_rag(mut self, rag: Arc<RagService>) -> Self {
        self.rag = Some(rag);
        self
    }

    pub fn with_pipeline(mut self, pipeline: Arc<BackgroundPipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }
}
