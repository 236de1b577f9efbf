//! HTML rendering for completed snapshots and the document index.

use crate::model::Snapshot;
use crate::store::DocumentRef;

const EMBED_URL: &str = "https://www.youtube.com/embed/";

/// Renders a snapshot into a standalone document: one block per populated
/// slot, with an embedded player only when a video id was resolved.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let title = escape(&snapshot.title());
    let mut body = String::new();
    for entry in snapshot.entries() {
        body.push_str(&format!(
            "<div class=\"position\">\n<h2>{}. {} - {}</h2>\n",
            entry.rank,
            escape(&entry.artist),
            escape(&entry.title)
        ));
        if let Some(id) = &entry.video_id {
            body.push_str(&format!(
                "<iframe width=\"560\" height=\"315\" src=\"{EMBED_URL}{id}\" \
                 frameborder=\"0\" allow=\"accelerometer; autoplay; encrypted-media; \
                 gyroscope; picture-in-picture\" allowfullscreen></iframe>\n",
                id = escape(id)
            ));
        }
        body.push_str("</div>\n");
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
    )
}

/// Renders the browsing index: one replay link per stored document, with the
/// date shown as `dd/mm/yyyy` and the region code alongside.
pub fn render_index(documents: &[DocumentRef]) -> String {
    let mut items = String::new();
    for doc in documents {
        let label = format!("{} ({})", doc.date.format("%d/%m/%Y"), doc.region);
        items.push_str(&format!(
            "<li><a href=\"res?fileName={}\">{}</a></li>\n",
            escape(&doc.name),
            escape(&label)
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Weekly charts</title></head>\n\
         <body>\n<h1>Weekly charts</h1>\n\
         <form action=\"action\" method=\"post\">\n\
         <input type=\"date\" name=\"curData\" required>\n\
         <select name=\"country\">\n\
         <option value=\"EN\">EN</option>\n\
         <option value=\"DE\">DE</option>\n\
         <option value=\"US\">US</option>\n\
         </select>\n\
         <button type=\"submit\">Fetch chart</button>\n\
         </form>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Region, Snapshot};
    use chrono::NaiveDate;

    fn snapshot() -> Snapshot {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut s = Snapshot::new(date, Region::Us);
        s.push("Artist & Co".into(), "Hit <One>".into());
        s.push("Nobody".into(), "No Clip".into());
        s.entries_mut().next().unwrap().video_id = Some("ABC123".into());
        s
    }

    #[test]
    fn player_embedded_only_when_video_resolved() {
        let html = render_snapshot(&snapshot());
        assert_eq!(html.matches("<iframe").count(), 1);
        assert!(html.contains("https://www.youtube.com/embed/ABC123"));
        assert!(html.contains("2. Nobody - No Clip"));
    }

    #[test]
    fn markup_sensitive_characters_are_escaped() {
        let html = render_snapshot(&snapshot());
        assert!(html.contains("Artist &amp; Co"));
        assert!(html.contains("Hit &lt;One&gt;"));
        assert!(!html.contains("Hit <One>"));
    }

    #[test]
    fn snapshot_title_is_used_as_heading() {
        let html = render_snapshot(&snapshot());
        assert!(html.contains("<h1>CHARTS(US) 2023-01-01</h1>"));
    }

    #[test]
    fn index_links_documents_with_display_dates() {
        let docs = vec![DocumentRef {
            name: "01012023_US".into(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            region: Region::Us,
        }];
        let html = render_index(&docs);
        assert!(html.contains("res?fileName=01012023_US"));
        assert!(html.contains("01/01/2023 (US)"));
    }

    #[test]
    fn empty_index_still_renders_the_form() {
        let html = render_index(&[]);
        assert!(html.contains("action=\"action\""));
        assert!(html.contains("name=\"curData\""));
    }
}
