use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of the archive index: an opaque page token and the ranking
/// date it was published for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    pub id: String,
    pub date: NaiveDate,
}

/// One row of a ranking table, already typed and cleaned.
///
/// Field order matches the output CSV column order, the serializer relies
/// on it for the header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRecord {
    pub id: u32,
    pub rank: u32,
    pub country_full: String,
    pub country_abrv: String,
    pub total_points: f64,
    pub previous_points: f64,
    pub rank_change: i32,
    pub confederation: String,
    pub rank_date: NaiveDate,
}

/// All rows parsed from a single snapshot, in source table order.
#[derive(Debug, Clone)]
pub struct SnapshotRecords {
    pub snapshot_id: String,
    pub date: NaiveDate,
    pub records: Vec<RankRecord>,
}

/// A snapshot the scheduler gave up on, with the failure kind for the log.
#[derive(Debug)]
pub struct FailedSnapshot {
    pub snapshot_id: String,
    pub date: NaiveDate,
    pub error: crate::error::FetchError,
}

/// User-facing result of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedSnapshot>,
    pub skipped_rows: usize,
    pub warnings: Vec<String>,
    pub output_file: Option<String>,
}
