//! Chart data model: ranked entries, the fixed-capacity snapshot, and the
//! supported region set.

use crate::error::ChartError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of slots in a chart snapshot.
pub const CHART_SIZE: usize = 10;

/// One ranked chart position. `artist` and `title` come verbatim from the
/// provider markup (either may be empty when the markup shifts); `video_id`
/// stays `None` until enrichment finds a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub rank: usize,
    pub artist: String,
    pub title: String,
    pub video_id: Option<String>,
}

/// Supported chart regions. Selection from user input goes through
/// [`Region::resolve`] so the fallback behavior is an explicit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    En,
    De,
    Us,
}

/// What to do with a region code outside the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionPolicy {
    /// Fall back to [`Region::En`], matching the historical behavior.
    #[default]
    Lenient,
    /// Report [`ChartError::UnknownRegion`] before anything is fetched.
    Strict,
}

impl Region {
    pub const DEFAULT: Region = Region::En;

    pub fn code(&self) -> &'static str {
        match self {
            Region::En => "EN",
            Region::De => "DE",
            Region::Us => "US",
        }
    }

    /// Case-insensitive lookup within the closed region set.
    pub fn from_code(code: &str) -> Option<Region> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EN" => Some(Region::En),
            "DE" => Some(Region::De),
            "US" => Some(Region::Us),
            _ => None,
        }
    }

    /// Maps a user-supplied code to a region under the given policy.
    pub fn resolve(code: &str, policy: RegionPolicy) -> Result<Region, ChartError> {
        match Region::from_code(code) {
            Some(region) => Ok(region),
            None => match policy {
                RegionPolicy::Lenient => Ok(Region::DEFAULT),
                RegionPolicy::Strict => Err(ChartError::UnknownRegion(code.to_string())),
            },
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Ordered, fixed-capacity result of one pipeline run. Slot `i` holds the
/// entry ranked `i + 1`; slots the source never filled stay empty. Pushing
/// past [`CHART_SIZE`] is silently ignored, which caps extraction on
/// unexpectedly deep pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub region: Region,
    slots: Vec<Option<ChartEntry>>,
}

impl Snapshot {
    pub fn new(date: NaiveDate, region: Region) -> Self {
        Self {
            date,
            region,
            slots: vec![None; CHART_SIZE],
        }
    }

    /// Fills the next empty slot in rank order. Returns `false` once the
    /// snapshot is full; the caller is expected to stop walking the page.
    pub fn push(&mut self, artist: String, title: String) -> bool {
        let Some(idx) = self.slots.iter().position(Option::is_none) else {
            return false;
        };
        self.slots[idx] = Some(ChartEntry {
            rank: idx + 1,
            artist,
            title,
            video_id: None,
        });
        true
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slots(&self) -> &[Option<ChartEntry>] {
        &self.slots
    }

    /// Populated entries in rank order.
    pub fn entries(&self) -> impl Iterator<Item = &ChartEntry> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut ChartEntry> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Deterministic store key for this snapshot, e.g. `01012023_US`.
    pub fn document_name(&self) -> String {
        format!("{}_{}", self.date.format("%d%m%Y"), self.region.code())
    }

    /// Heading used when the snapshot is rendered into a document.
    pub fn title(&self) -> String {
        format!("CHARTS({}) {}", self.region.code(), self.date)
    }
}

/// Parses the chart date `input` with the given chrono `format`, reporting a
/// [`ChartError::InvalidDate`] the caller can surface before any fetch.
pub fn parse_chart_date(input: &str, format: &str) -> Result<NaiveDate, ChartError> {
    NaiveDate::parse_from_str(input, format).map_err(|source| ChartError::InvalidDate {
        input: input.to_string(),
        source,
    })
}

/// Splits a document name back into its date and region, or `None` when the
/// name was not produced by [`Snapshot::document_name`]. Both halves are
/// validated, so the set of addressable names is closed.
pub fn parse_document_name(name: &str) -> Option<(NaiveDate, Region)> {
    let (date_part, region_part) = name.split_once('_')?;
    let date = NaiveDate::parse_from_str(date_part, "%d%m%Y").ok()?;
    let region = Region::from_code(region_part)?;
    Some((date, region))
}
