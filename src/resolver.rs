//! Best-effort video enrichment via the YouTube results page.
//!
//! A lookup is never authoritative: the search may yield nothing usable, and
//! that is an expected outcome rather than an error. Navigation failures are
//! reported per lookup so the caller can skip the entry and continue.

use crate::error::ResolveError;
use crate::model::ChartEntry;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const SEARCH_URL: &str = "https://www.youtube.com/results";
const USER_AGENT: &str = "chartsnap/0.1";

fn watch_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"/watch\?v=([^&"\\]+)"#).expect("watch link pattern"))
}

/// Pulls the video id out of a result link target such as
/// `/watch?v=ABC123&list=xyz`; the id runs up to the next delimiter.
pub fn extract_watch_id(href: &str) -> Option<String> {
    watch_link()
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Search step behind the resolver. The production implementation talks to
/// YouTube; tests substitute a canned backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Link target of the first usable result, or `None` when the search
    /// yields nothing.
    async fn first_result_href(&self, query: &str) -> Result<Option<String>, ResolveError>;
}

/// One search session per pipeline run. The underlying client is reused for
/// every lookup in the run and released when the session is dropped.
pub struct YoutubeSearch {
    client: Client,
    settle: Duration,
    search_url: String,
}

impl YoutubeSearch {
    pub fn open(settle: Duration, lookup_timeout: Duration) -> Result<Self, ResolveError> {
        Self::open_at(SEARCH_URL, settle, lookup_timeout)
    }

    fn open_at(
        search_url: &str,
        settle: Duration,
        lookup_timeout: Duration,
    ) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(lookup_timeout)
            .build()?;
        Ok(Self {
            client,
            settle,
            search_url: search_url.to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for YoutubeSearch {
    async fn first_result_href(&self, query: &str) -> Result<Option<String>, ResolveError> {
        // Fixed settle interval between lookups; the only pacing we apply.
        tokio::time::sleep(self.settle).await;
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("search_query", query)])
            .send()
            .await?;
        let body = response.text().await?;
        Ok(watch_link().find(&body).map(|m| m.as_str().to_string()))
    }
}

/// Maps one entry's artist/title to a best-guess video id.
pub struct VideoResolver<'a> {
    backend: &'a dyn SearchBackend,
}

impl<'a> VideoResolver<'a> {
    pub fn new(backend: &'a dyn SearchBackend) -> Self {
        Self { backend }
    }

    /// Sets `entry.video_id` when the search finds a usable result. Returns
    /// `Ok(true)` on a match and `Ok(false)` on the expected no-match case;
    /// `rank`, `artist` and `title` are never touched.
    pub async fn resolve(&self, entry: &mut ChartEntry) -> Result<bool, ResolveError> {
        let query = format!("{} {}", entry.artist, entry.title);
        let Some(href) = self.backend.first_result_href(&query).await? else {
            debug!(rank = entry.rank, "search returned no result element");
            return Ok(false);
        };
        match extract_watch_id(&href) {
            Some(id) => {
                entry.video_id = Some(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
