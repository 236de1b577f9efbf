use crate::model::RegionPolicy;
use crate::pipeline::PipelineConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Weekly chart scraper and snapshot browser.
#[derive(Parser)]
#[command(name = "chartsnap")]
#[command(about = "Fetch weekly music charts and browse stored snapshots", long_about = None)]
pub struct Cli {
    /// Directory where chart documents are stored
    #[arg(long, env = "CHARTSNAP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Milliseconds to wait before each video lookup
    #[arg(long, env = "CHARTSNAP_SETTLE_MS", default_value_t = 1000)]
    pub settle_ms: u64,

    /// Per-lookup timeout in seconds
    #[arg(long, env = "CHARTSNAP_LOOKUP_TIMEOUT_SECS", default_value_t = 15)]
    pub lookup_timeout_secs: u64,

    /// Reject unknown region codes instead of falling back to EN
    #[arg(long, env = "CHARTSNAP_STRICT_REGION", default_value_t = false)]
    pub strict_region: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one chart snapshot for a date
    Fetch {
        /// Chart date in ddmmyyyy format
        date: String,
        /// Region code (EN, DE, US)
        #[arg(short, long, default_value = "EN")]
        region: String,
    },
    /// Serve the chart browser over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, env = "CHARTSNAP_PORT", default_value_t = 5000)]
        port: u16,
    },
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            settle: Duration::from_millis(self.settle_ms),
            lookup_timeout: Duration::from_secs(self.lookup_timeout_secs),
            region_policy: if self.strict_region {
                RegionPolicy::Strict
            } else {
                RegionPolicy::Lenient
            },
        }
    }
}
