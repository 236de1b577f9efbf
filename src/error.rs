use thiserror::Error;

/// Errors that propagate out of a pipeline run to its caller.
///
/// Fetch and lookup failures are deliberately not represented here: the
/// pipeline absorbs them and degrades the snapshot instead of aborting.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The requested chart date could not be parsed. Reported before any
    /// fetch occurs; no partial run is attempted.
    #[error("invalid chart date {input:?}: {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Region code outside the supported set, under the strict policy.
    #[error("unknown region code {0:?}")]
    UnknownRegion(String),

    /// The completed document could not be written or read back. The run
    /// itself has already finished by the time this surfaces.
    #[error("document store failure for {name:?}: {source}")]
    Persistence {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Non-fatal failure fetching or parsing one provider chart page. The caller
/// logs it and keeps whatever entries were gathered before the failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid selector {0:?}")]
    Selector(String),
}

/// Failure of a single video lookup. Isolated to its entry: the enrichment
/// loop logs it, leaves `video_id` absent, and moves on.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("search navigation failed: {0}")]
    Navigation(#[from] reqwest::Error),
}
