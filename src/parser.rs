use crate::error::{FetchError, RowParseError};
use crate::types::RankRecord;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Everything extracted from one snapshot page: the rows that parsed
/// cleanly, in source order, and the rows that had to be dropped.
#[derive(Debug)]
pub struct ParsedSnapshot {
    pub records: Vec<RankRecord>,
    pub row_errors: Vec<RowParseError>,
}

/// Parses one snapshot's ranking table into typed records.
pub struct TableParser {
    tbody: Selector,
    row: Selector,
    name_full: Selector,
    name_abrv: Selector,
    rank: Selector,
    points: Selector,
    prev_points: Selector,
    movement: Selector,
    confederation: Selector,
}

impl TableParser {
    pub fn new() -> Self {
        Self {
            tbody: Selector::parse("tbody").unwrap(),
            row: Selector::parse("tr").unwrap(),
            name_full: Selector::parse("span.fi-t__nText").unwrap(),
            name_abrv: Selector::parse("span.fi-t__nTri").unwrap(),
            rank: Selector::parse("td.fi-table__rank").unwrap(),
            points: Selector::parse("td.fi-table__points").unwrap(),
            prev_points: Selector::parse("td.fi-table__prevpoints").unwrap(),
            movement: Selector::parse("td.fi-table__rankingmovement").unwrap(),
            confederation: Selector::parse("td.fi-table__confederation").unwrap(),
        }
    }

    /// Extracts all rows of the ranking table. A row missing a field is
    /// reported and skipped; a page without the table container fails the
    /// whole snapshot with `PageSchemaChanged`.
    pub fn parse(
        &self,
        html: &str,
        date: NaiveDate,
    ) -> std::result::Result<ParsedSnapshot, FetchError> {
        let document = Html::parse_document(html);

        let tbody = document
            .select(&self.tbody)
            .next()
            .ok_or(FetchError::PageSchemaChanged)?;

        let mut records = Vec::new();
        let mut row_errors = Vec::new();

        for (row_index, row) in tbody.select(&self.row).enumerate() {
            match self.parse_row(row, row_index, date) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Dropping unparseable row: {}", e);
                    row_errors.push(e);
                }
            }
        }

        Ok(ParsedSnapshot {
            records,
            row_errors,
        })
    }

    fn parse_row(
        &self,
        row: ElementRef,
        row_index: usize,
        date: NaiveDate,
    ) -> std::result::Result<RankRecord, RowParseError> {
        let missing = |field: &'static str| RowParseError { row_index, field };

        let id: u32 = row
            .value()
            .attr("data-team-id")
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| missing("data-team-id"))?;

        let country_full = self
            .cell_text(row, &self.name_full)
            .ok_or_else(|| missing("country_full"))?;
        let country_abrv = self
            .cell_text(row, &self.name_abrv)
            .ok_or_else(|| missing("country_abrv"))?;

        let rank: u32 = self
            .cell_text(row, &self.rank)
            .and_then(|t| t.parse().ok())
            .filter(|r| *r > 0)
            .ok_or_else(|| missing("rank"))?;

        let total_points: f64 = self
            .cell_text(row, &self.points)
            .and_then(|t| t.parse().ok())
            .filter(|p| *p >= 0.0)
            .ok_or_else(|| missing("total_points"))?;

        // A blank previous-points cell means the team had no prior score.
        let previous_points: f64 = match self.cell_text(row, &self.prev_points) {
            Some(t) if !t.is_empty() => t.parse().map_err(|_| missing("previous_points"))?,
            Some(_) => 0.0,
            None => return Err(missing("previous_points")),
        };

        let rank_change = self
            .cell_text(row, &self.movement)
            .ok_or_else(|| missing("rank_change"))
            .and_then(|t| parse_movement(&t).ok_or_else(|| missing("rank_change")))?;

        let confederation = self
            .cell_text(row, &self.confederation)
            .map(|t| t.trim_start_matches('#').to_string())
            .ok_or_else(|| missing("confederation"))?;

        Ok(RankRecord {
            id,
            rank,
            country_full,
            country_abrv,
            total_points,
            previous_points,
            rank_change,
            confederation,
            rank_date: date,
        })
    }

    fn cell_text(&self, row: ElementRef, selector: &Selector) -> Option<String> {
        row.select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A lone dash (or em/en dash) in the movement cell denotes "no prior
/// rank" and counts as 0; anything else must be a signed integer.
fn parse_movement(text: &str) -> Option<i32> {
    match text {
        "" | "-" | "\u{2014}" | "\u{2013}" => Some(0),
        other => other.parse().ok(),
    }
}
