//! Orchestration of one chart run: select the source for the region, extract
//! the ranked entries, then enrich them in rank order over a single search
//! session. Every run owns its snapshot, so concurrent runs cannot corrupt
//! each other.

use crate::error::ChartError;
use crate::model::{Region, RegionPolicy, Snapshot};
use crate::resolver::{SearchBackend, VideoResolver, YoutubeSearch};
use crate::sources::{source_for, ChartSource};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

const USER_AGENT: &str = "chartsnap/0.1";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunable knobs for a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fixed delay before each video lookup.
    pub settle: Duration,
    /// Deadline for a single video lookup.
    pub lookup_timeout: Duration,
    /// What to do with unknown region codes.
    pub region_policy: RegionPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            lookup_timeout: Duration::from_secs(15),
            region_policy: RegionPolicy::Lenient,
        }
    }
}

pub struct ChartPipeline {
    client: Client,
    config: PipelineConfig,
}

impl ChartPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("building chart fetch client")?;
        Ok(Self { client, config })
    }

    /// Runs the full pipeline for one `(date, region)` pair and returns the
    /// completed snapshot. Only region validation can fail here; fetch and
    /// lookup problems degrade the snapshot instead of aborting the run.
    pub async fn run(&self, date: NaiveDate, region_code: &str) -> Result<Snapshot, ChartError> {
        let region = Region::resolve(region_code, self.config.region_policy)?;
        let source = source_for(region);

        // Search session scoped to this run; dropped when enrichment ends.
        match YoutubeSearch::open(self.config.settle, self.config.lookup_timeout) {
            Ok(search) => Ok(self.execute(source, &search, date).await),
            Err(err) => {
                warn!(error = %err, "search session unavailable; snapshot will not be enriched");
                Ok(self.extract(source, date).await)
            }
        }
    }

    async fn execute(
        &self,
        source: &dyn ChartSource,
        search: &dyn SearchBackend,
        date: NaiveDate,
    ) -> Snapshot {
        let mut snapshot = self.extract(source, date).await;
        self.enrich(search, &mut snapshot).await;
        snapshot
    }

    async fn extract(&self, source: &dyn ChartSource, date: NaiveDate) -> Snapshot {
        let mut snapshot = Snapshot::new(date, source.region());
        info!(region = %snapshot.region, %date, "reading chart page");
        if let Err(err) = source
            .fetch_chart(&self.client, date, &mut snapshot)
            .await
        {
            // Entries gathered before the failure stay in place.
            warn!(region = %snapshot.region, error = %err, "chart fetch failed; keeping partial snapshot");
        }
        info!(entries = snapshot.len(), "chart extraction finished");
        snapshot
    }

    async fn enrich(&self, search: &dyn SearchBackend, snapshot: &mut Snapshot) {
        let resolver = VideoResolver::new(search);
        for entry in snapshot.entries_mut() {
            info!(
                rank = entry.rank,
                artist = %entry.artist,
                title = %entry.title,
                "looking up video"
            );
            match resolver.resolve(entry).await {
                Ok(true) => {}
                Ok(false) => info!(rank = entry.rank, "no video match"),
                Err(err) => {
                    // One broken lookup must not void the whole snapshot.
                    warn!(rank = entry.rank, error = %err, "video lookup failed; entry left unresolved");
                }
            }
        }
    }
}
