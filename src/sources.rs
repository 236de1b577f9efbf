//! Provider-specific chart extractors.
//!
//! Each provider publishes its weekly chart as an HTML page whose repeating
//! container elements appear in rank order. An extractor owns the provider's
//! URL shape (including its date format) and the selectors for the container
//! and the artist/title labels inside it; everything else is shared.

use crate::error::FetchError;
use crate::model::{Region, Snapshot};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const CHART_URL_EN: &str = "https://www.officialcharts.com/charts/singles-chart/";
const CHART_URL_DE: &str = "https://www.offiziellecharts.de/charts/single/for-date-";
const CHART_URL_US: &str = "https://www.billboard.com/charts/hot-100/";

/// One chart provider. `fetch_chart` performs the single page fetch and fills
/// the snapshot; any failure is returned for logging, but entries gathered
/// before the failure stay in place.
#[async_trait]
pub trait ChartSource: Send + Sync {
    fn region(&self) -> Region;

    /// Provider URL for the chart of the given week.
    fn chart_url(&self, date: NaiveDate) -> String;

    /// Walks the page markup and pushes up to [`crate::model::CHART_SIZE`]
    /// entries in document order.
    fn parse_chart(&self, html: &str, snapshot: &mut Snapshot) -> Result<(), FetchError>;

    async fn fetch_chart(
        &self,
        client: &Client,
        date: NaiveDate,
        snapshot: &mut Snapshot,
    ) -> Result<(), FetchError> {
        let url = self.chart_url(date);
        debug!(%url, "fetching chart page");
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;
        self.parse_chart(&body, snapshot)
    }
}

/// Selects the extractor for a region.
pub fn source_for(region: Region) -> &'static dyn ChartSource {
    match region {
        Region::En => &OfficialChartsUk,
        Region::De => &OffizielleChartsDe,
        Region::Us => &BillboardHot100,
    }
}

/// CSS selectors identifying one provider's chart rows.
struct SelectorSpec {
    container: &'static str,
    artist: &'static str,
    title: &'static str,
}

/// Shared container walk: document order is rank order, a missing label is an
/// empty string, and the walk stops as soon as the snapshot is full.
fn walk_containers(
    html: &str,
    spec: &SelectorSpec,
    snapshot: &mut Snapshot,
) -> Result<(), FetchError> {
    let container = parse_selector(spec.container)?;
    let artist = parse_selector(spec.artist)?;
    let title = parse_selector(spec.title)?;

    let document = Html::parse_document(html);
    for row in document.select(&container) {
        if snapshot.is_full() {
            break;
        }
        snapshot.push(child_text(row, &artist), child_text(row, &title));
    }
    Ok(())
}

fn parse_selector(selector: &'static str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|_| FetchError::Selector(selector.to_string()))
}

fn child_text(row: ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// officialcharts.com singles chart (Provider-EN).
pub struct OfficialChartsUk;

#[async_trait]
impl ChartSource for OfficialChartsUk {
    fn region(&self) -> Region {
        Region::En
    }

    fn chart_url(&self, date: NaiveDate) -> String {
        format!("{CHART_URL_EN}{}", date.format("%Y%m%d"))
    }

    fn parse_chart(&self, html: &str, snapshot: &mut Snapshot) -> Result<(), FetchError> {
        walk_containers(
            html,
            &SelectorSpec {
                container: "div.description.block",
                artist: "a.chart-artist",
                title: "a.chart-name",
            },
            snapshot,
        )
    }
}

/// offiziellecharts.de singles chart (Provider-DE). The site addresses weeks
/// by a millisecond Unix timestamp at midnight UTC.
pub struct OffizielleChartsDe;

#[async_trait]
impl ChartSource for OffizielleChartsDe {
    fn region(&self) -> Region {
        Region::De
    }

    fn chart_url(&self, date: NaiveDate) -> String {
        let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        format!("{CHART_URL_DE}{millis}")
    }

    fn parse_chart(&self, html: &str, snapshot: &mut Snapshot) -> Result<(), FetchError> {
        walk_containers(
            html,
            &SelectorSpec {
                container: "tr.drill-down-link",
                artist: ".info-artist",
                title: ".info-title",
            },
            snapshot,
        )
    }
}

/// billboard.com Hot 100 (Provider-US).
pub struct BillboardHot100;

#[async_trait]
impl ChartSource for BillboardHot100 {
    fn region(&self) -> Region {
        Region::Us
    }

    fn chart_url(&self, date: NaiveDate) -> String {
        format!("{CHART_URL_US}{}", date.format("%Y-%m-%d"))
    }

    fn parse_chart(&self, html: &str, snapshot: &mut Snapshot) -> Result<(), FetchError> {
        walk_containers(
            html,
            &SelectorSpec {
                container: "div.o-chart-results-list-row-container",
                artist: "span.c-label.u-letter-spacing-0021.u-max-width-330",
                title: "h3#title-of-a-story.c-title.a-no-trucate.a-font-primary-bold-s.u-letter-spacing-0021",
            },
            snapshot,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CHART_SIZE;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn uk_page(rows: usize) -> String {
        let mut html = String::from("<html><body>");
        for i in 1..=rows {
            html.push_str(&format!(
                "<div class=\"description block\">\
                 <a class=\"chart-artist\">Artist {i}</a>\
                 <a class=\"chart-name\">Song {i}</a>\
                 </div>"
            ));
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn uk_url_uses_compact_date() {
        assert_eq!(
            OfficialChartsUk.chart_url(date()),
            "https://www.officialcharts.com/charts/singles-chart/20230101"
        );
    }

    #[test]
    fn de_url_uses_millisecond_timestamp() {
        assert_eq!(
            OffizielleChartsDe.chart_url(date()),
            "https://www.offiziellecharts.de/charts/single/for-date-1672531200000"
        );
    }

    #[test]
    fn us_url_uses_iso_date() {
        assert_eq!(
            BillboardHot100.chart_url(date()),
            "https://www.billboard.com/charts/hot-100/2023-01-01"
        );
    }

    #[test]
    fn source_for_covers_every_region() {
        for region in [Region::En, Region::De, Region::Us] {
            assert_eq!(source_for(region).region(), region);
        }
    }

    #[test]
    fn parses_rows_in_document_order() {
        let mut snapshot = Snapshot::new(date(), Region::En);
        OfficialChartsUk
            .parse_chart(&uk_page(3), &mut snapshot)
            .unwrap();
        let entries: Vec<_> = snapshot.entries().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].artist, "Artist 1");
        assert_eq!(entries[0].title, "Song 1");
        assert_eq!(entries[2].rank, 3);
        assert_eq!(entries[2].title, "Song 3");
    }

    #[test]
    fn stops_after_capacity_even_on_deep_pages() {
        let mut snapshot = Snapshot::new(date(), Region::En);
        OfficialChartsUk
            .parse_chart(&uk_page(25), &mut snapshot)
            .unwrap();
        assert_eq!(snapshot.len(), CHART_SIZE);
        assert!(snapshot
            .entries()
            .all(|e| e.rank >= 1 && e.rank <= CHART_SIZE));
    }

    #[test]
    fn missing_label_becomes_empty_string() {
        let html = "<div class=\"description block\">\
                    <a class=\"chart-name\">Only A Title</a>\
                    </div>";
        let mut snapshot = Snapshot::new(date(), Region::En);
        OfficialChartsUk.parse_chart(html, &mut snapshot).unwrap();
        let entry = snapshot.entries().next().unwrap();
        assert_eq!(entry.artist, "");
        assert_eq!(entry.title, "Only A Title");
    }

    #[test]
    fn zero_containers_leaves_snapshot_empty() {
        let mut snapshot = Snapshot::new(date(), Region::Us);
        BillboardHot100
            .parse_chart("<html><body><p>layout changed</p></body></html>", &mut snapshot)
            .unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn german_rows_parse_with_class_selectors() {
        let html = "<table><tr class=\"drill-down-link\">\
                    <td><span class=\"info-artist\">Künstler</span>\
                    <span class=\"info-title\">Lied</span></td>\
                    </tr></table>";
        let mut snapshot = Snapshot::new(date(), Region::De);
        OffizielleChartsDe.parse_chart(html, &mut snapshot).unwrap();
        let entry = snapshot.entries().next().unwrap();
        assert_eq!(entry.artist, "Künstler");
        assert_eq!(entry.title, "Lied");
    }
}
