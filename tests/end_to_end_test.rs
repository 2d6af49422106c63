mod common;

use anyhow::Result;
use common::{ranking_row, snapshot_page, FakeArchive};
use fifa_ranking_scraper::config::Config;
use fifa_ranking_scraper::pipeline;
use fifa_ranking_scraper::types::RankRecord;
use std::sync::Arc;
use tempfile::tempdir;

const INDEX: &[(&str, &str)] = &[
    ("s1", "01 January 2020"),
    ("s2", "01 February 2020"),
    ("s3", "01 March 2020"),
];

fn build_archive() -> FakeArchive {
    let s1_rows = vec![
        ranking_row(43946, 1, "Belgium", "BEL", "1765", "1752", "0"),
        ranking_row(296, 2, "Eswatini", "SWZ", "1733", "", "-"),
    ];
    let s3_rows = vec![
        ranking_row(43946, 1, "Belgium", "BEL", "1780", "1765", "0"),
        ranking_row(296, 2, "Eswatini", "SWZ", "1740", "1733", "0"),
        ranking_row(1903356, 3, "Montenegro", "MNE", "1200", "1190", "1"),
        ranking_row(43934, 4, "Montenegro", "MNE", "1200", "1190", "-1"),
    ];

    FakeArchive::new()
        .with_page("s1", snapshot_page(INDEX, &s1_rows))
        .failing("s2")
        .with_page("s3", snapshot_page(INDEX, &s3_rows))
}

fn test_config(output_dir: &str) -> Config {
    let mut config = Config::default();
    config.archive.entry_snapshot_id = "s1".to_string();
    config.archive.max_concurrent = 2;
    config.output.dir = output_dir.to_string();
    config
}

#[tokio::test]
async fn failed_snapshot_is_skipped_and_dataset_is_normalized() -> Result<()> {
    let dir = tempdir()?;
    let config = test_config(dir.path().to_str().unwrap());

    let summary = pipeline::run(Arc::new(build_archive()), &config).await?;

    assert_eq!(summary.requested, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].snapshot_id, "s2");
    assert_eq!(summary.failed[0].error.kind(), "network");

    // Only the date-count check should fire: one snapshot is missing.
    assert_eq!(summary.warnings.len(), 1);
    assert!(summary.warnings[0].contains("rank date count"));

    let output_file = summary.output_file.expect("dataset file was written");
    assert!(output_file.ends_with("fifa_ranking-2020-03-01.csv"));

    let mut reader = csv::Reader::from_path(&output_file)?;
    let records: Vec<RankRecord> = reader.deserialize().collect::<Result<_, _>>()?;

    // s2 contributes nothing; the rest is sorted ascending by date.
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.rank_date.to_string() != "2020-02-01"));
    assert!(records.windows(2).all(|w| w[0].rank_date <= w[1].rank_date));

    // Known renames applied, known duplicate removed.
    assert!(records.iter().any(|r| r.country_full == "Swaziland"));
    assert!(records.iter().all(|r| r.country_full != "Eswatini"));
    assert!(records.iter().all(|r| r.id != 1903356));

    // Blank previous points and dash movement from the s1 fixture.
    let eswatini_jan = records
        .iter()
        .find(|r| r.id == 296 && r.rank_date.to_string() == "2020-01-01")
        .unwrap();
    assert_eq!(eswatini_jan.previous_points, 0.0);
    assert_eq!(eswatini_jan.rank_change, 0);

    Ok(())
}

#[tokio::test]
async fn unreachable_index_is_fatal() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());
    let archive = FakeArchive::new().failing("s1");

    let err = pipeline::run(Arc::new(archive), &config).await.unwrap_err();
    assert!(matches!(
        err,
        fifa_ranking_scraper::error::ScrapeError::IndexUnavailable(_)
    ));
}

#[tokio::test]
async fn all_snapshots_failing_yields_empty_dataset_error() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    // s1 serves the schedule list but no table body, s2 and s3 fail
    // outright, so the index resolves and zero snapshots parse.
    let index_only = snapshot_page(INDEX, &[]).replace("<table><tbody></tbody></table>", "");
    let archive = FakeArchive::new()
        .with_page("s1", index_only)
        .failing("s2")
        .failing("s3");

    let err = pipeline::run(Arc::new(archive), &config).await.unwrap_err();
    assert!(matches!(
        err,
        fifa_ranking_scraper::error::ScrapeError::EmptyDataset
    ));
}
