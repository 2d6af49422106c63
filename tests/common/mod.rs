use async_trait::async_trait;
use fifa_ranking_scraper::error::FetchError;
use fifa_ranking_scraper::fetch::PageSource;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// One ranking table row in the archive's markup.
pub fn ranking_row(
    id: u32,
    rank: u32,
    name: &str,
    abrv: &str,
    points: &str,
    prev: &str,
    movement: &str,
) -> String {
    format!(
        r#"<tr data-team-id="{id}">
            <td class="fi-table__rank">{rank}</td>
            <td><span class="fi-t__nText">{name}</span><span class="fi-t__nTri">{abrv}</span></td>
            <td class="fi-table__points">{points}</td>
            <td class="fi-table__prevpoints">{prev}</td>
            <td class="fi-table__rankingmovement">{movement}</td>
            <td class="fi-table__confederation">#UEFA</td>
        </tr>"#
    )
}

/// A full snapshot page: the schedule list (rendered on every page of the
/// real archive) plus this snapshot's table.
pub fn snapshot_page(index_items: &[(&str, &str)], rows: &[String]) -> String {
    let lis: String = index_items
        .iter()
        .map(|(id, date)| {
            format!(r#"<li class="fi-ranking-schedule__nav__item" data-value="{id}">{date}</li>"#)
        })
        .collect();
    format!(
        "<html><body><ul>{lis}</ul><table><tbody>{}</tbody></table></body></html>",
        rows.join("")
    )
}

/// In-memory stand-in for the remote archive, with optional artificial
/// latency and an injected failure subset.
pub struct FakeArchive {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    max_delay_ms: u64,
}

impl FakeArchive {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
            max_delay_ms: 0,
        }
    }

    pub fn with_page(mut self, id: &str, html: String) -> Self {
        self.pages.insert(id.to_string(), html);
        self
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn with_max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }
}

#[async_trait]
impl PageSource for FakeArchive {
    async fn fetch(&self, snapshot_id: &str) -> Result<String, FetchError> {
        let delay = if self.max_delay_ms > 0 {
            rand::thread_rng().gen_range(0..self.max_delay_ms)
        } else {
            0
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.failing.contains(snapshot_id) {
            return Err(FetchError::Network("injected failure".to_string()));
        }
        self.pages
            .get(snapshot_id)
            .cloned()
            .ok_or(FetchError::Http { status: 404 })
    }
}
