use crate::types::{RankRecord, SnapshotRef};
use std::collections::HashSet;
use tracing::warn;

/// Cross-validates the assembled dataset against the index. Every check is
/// a warning, never an error; they exist to catch silent parsing or
/// normalization drift without halting the pipeline.
pub fn check_dataset(records: &[RankRecord], index: &[SnapshotRef]) -> Vec<String> {
    let mut warnings = Vec::new();

    let dataset_dates: HashSet<_> = records.iter().map(|r| r.rank_date).collect();
    let index_dates: HashSet<_> = index.iter().map(|s| s.date).collect();
    if dataset_dates.len() != index_dates.len() {
        warnings.push(format!(
            "rank date count mismatch: dataset has {}, index has {}",
            dataset_dates.len(),
            index_dates.len()
        ));
    }

    let names: HashSet<_> = records.iter().map(|r| r.country_full.as_str()).collect();
    let abbrevs: HashSet<_> = records.iter().map(|r| r.country_abrv.as_str()).collect();
    if names.len() != abbrevs.len() {
        warnings.push(format!(
            "name/abbreviation count mismatch: {} full names vs {} abbreviations",
            names.len(),
            abbrevs.len()
        ));
    }

    let ids: HashSet<_> = records.iter().map(|r| r.id).collect();
    if names.len() != ids.len() {
        warnings.push(format!(
            "name/id count mismatch: {} full names vs {} entity ids",
            names.len(),
            ids.len()
        ));
    }

    for warning in &warnings {
        warn!("Consistency check: {}", warning);
    }
    warnings
}
