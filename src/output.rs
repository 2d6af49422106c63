use crate::error::{Result, ScrapeError};
use crate::types::RankRecord;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the dataset as UTF-8 CSV with one header row. Column order comes
/// from the `RankRecord` field order. Returns the written file path.
pub fn write_csv(dataset: &[RankRecord], output_dir: &str) -> Result<String> {
    let max_date = dataset
        .iter()
        .map(|r| r.rank_date)
        .max()
        .ok_or(ScrapeError::EmptyDataset)?;

    fs::create_dir_all(output_dir)?;
    let filename = format!("fifa_ranking-{}.csv", max_date.format("%Y-%m-%d"));
    let filepath = Path::new(output_dir).join(&filename);

    let mut writer = csv::Writer::from_path(&filepath)?;
    for record in dataset {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Saved {} records to {}", dataset.len(), filepath.display());
    Ok(filepath.to_string_lossy().to_string())
}
