pub mod cli;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod server;
pub mod sources;
pub mod store;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::error::ChartError;
    pub use crate::model::{ChartEntry, Region, RegionPolicy, Snapshot, CHART_SIZE};
    pub use crate::pipeline::{ChartPipeline, PipelineConfig};
    pub use crate::store::{DocumentRef, DocumentStore, FsDocumentStore};
}

use crate::error::ChartError;
use crate::pipeline::{ChartPipeline, PipelineConfig};
use crate::store::{DocumentRef, DocumentStore, FsDocumentStore};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

/// Library entry point. Owns the pipeline and the document store; both the
/// CLI and the HTTP front-end go through it.
pub struct ChartService {
    pipeline: ChartPipeline,
    store: FsDocumentStore,
}

impl ChartService {
    pub fn new(config: PipelineConfig, output_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            pipeline: ChartPipeline::new(config)?,
            store: FsDocumentStore::new(output_dir),
        })
    }

    /// Runs one chart snapshot and persists the rendered document, returning
    /// the document name it was stored under.
    pub async fn run_and_store(
        &self,
        date: NaiveDate,
        region_code: &str,
    ) -> Result<String, ChartError> {
        let snapshot = self.pipeline.run(date, region_code).await?;
        let name = snapshot.document_name();
        info!(%name, "writing chart document");
        let html = render::render_snapshot(&snapshot);
        self.store.save(&name, &html).await?;
        Ok(name)
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentRef>, ChartError> {
        self.store.list().await
    }

    pub async fn read_document(&self, name: &str) -> Result<Option<String>, ChartError> {
        self.store.read(name).await
    }
}
