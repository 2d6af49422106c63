use crate::error::{Result, ScrapeError};
use crate::types::{RankRecord, SnapshotRecords};

/// Merges all per-snapshot groups into one dataset sorted ascending by
/// rank date. The sort is stable over groups, so within a snapshot the
/// source table's rank order is preserved.
pub fn assemble(mut groups: Vec<SnapshotRecords>) -> Result<Vec<RankRecord>> {
    if groups.is_empty() {
        return Err(ScrapeError::EmptyDataset);
    }

    groups.sort_by_key(|g| g.date);

    let total: usize = groups.iter().map(|g| g.records.len()).sum();
    let mut dataset = Vec::with_capacity(total);
    for group in groups {
        dataset.extend(group.records);
    }
    Ok(dataset)
}
