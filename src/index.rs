use crate::error::{Result, ScrapeError};
use crate::fetch::PageSource;
use crate::types::SnapshotRef;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::info;

/// The archive renders its full schedule of historical snapshots as a
/// navigation list on every snapshot page; any valid snapshot id serves as
/// the entry point.
pub struct SnapshotIndexFetcher {
    entry_snapshot_id: String,
}

impl SnapshotIndexFetcher {
    pub fn new(entry_snapshot_id: impl Into<String>) -> Self {
        Self {
            entry_snapshot_id: entry_snapshot_id.into(),
        }
    }

    /// Retrieves and parses the snapshot index, sorted ascending by date.
    pub async fn fetch_index(&self, source: &dyn PageSource) -> Result<Vec<SnapshotRef>> {
        let html = source
            .fetch(&self.entry_snapshot_id)
            .await
            .map_err(|e| ScrapeError::IndexUnavailable(e.to_string()))?;

        let index = parse_index(&html)?;
        info!(
            "Index lists {} snapshots, last date {}",
            index.len(),
            index.last().map(|s| s.date.to_string()).unwrap_or_default()
        );
        Ok(index)
    }
}

/// Extracts `(snapshot_id, date)` pairs from the schedule list and checks
/// the index invariants: ids unique, dates unique, sorted ascending.
pub fn parse_index(html: &str) -> Result<Vec<SnapshotRef>> {
    let document = Html::parse_document(html);
    let item = Selector::parse("li.fi-ranking-schedule__nav__item").unwrap();

    let mut refs = Vec::new();
    for li in document.select(&item) {
        let id = li
            .value()
            .attr("data-value")
            .ok_or(ScrapeError::IndexSchemaChanged)?
            .to_string();
        let text = li.text().collect::<String>();
        let date = NaiveDate::parse_from_str(text.trim(), "%d %B %Y")
            .map_err(|_| ScrapeError::IndexSchemaChanged)?;
        refs.push(SnapshotRef { id, date });
    }

    if refs.is_empty() {
        return Err(ScrapeError::IndexSchemaChanged);
    }

    refs.sort_by_key(|s| s.date);

    let distinct_ids: HashSet<&str> = refs.iter().map(|s| s.id.as_str()).collect();
    let distinct_dates: HashSet<NaiveDate> = refs.iter().map(|s| s.date).collect();
    if distinct_ids.len() != refs.len() || distinct_dates.len() != refs.len() {
        return Err(ScrapeError::IndexInconsistent {
            ids: distinct_ids.len(),
            dates: distinct_dates.len(),
        });
    }

    Ok(refs)
}
