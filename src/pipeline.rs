use crate::assemble;
use crate::check;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::PageSource;
use crate::index::SnapshotIndexFetcher;
use crate::normalize::IdentityNormalizer;
use crate::output;
use crate::parser::TableParser;
use crate::scheduler::ConcurrentFetchScheduler;
use crate::types::RunSummary;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Runs the whole fetch → parse → normalize → assemble pipeline and writes
/// the CSV. Index-level failures and an empty result are the only fatal
/// outcomes; individual snapshots degrade into the failure log.
#[instrument(skip(source, config))]
pub async fn run(source: Arc<dyn PageSource>, config: &Config) -> Result<RunSummary> {
    let started = std::time::Instant::now();

    let index = SnapshotIndexFetcher::new(config.archive.entry_snapshot_id.clone())
        .fetch_index(source.as_ref())
        .await?;

    let deadline = match config.archive.batch_deadline_seconds {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let scheduler = ConcurrentFetchScheduler::new(config.archive.max_concurrent, deadline);
    let outcome = scheduler
        .run(Arc::clone(&source), Arc::new(TableParser::new()), &index)
        .await;

    let requested = index.len();
    let succeeded = outcome.groups.len();
    let skipped_rows = outcome.skipped_rows;
    let failures = outcome.failures;

    let dataset = assemble::assemble(outcome.groups)?;

    let normalizer = match &config.rules_file {
        Some(path) => IdentityNormalizer::from_file(path)?,
        None => IdentityNormalizer::with_default_rules(),
    };
    let dataset = normalizer.apply(dataset);

    let warnings = check::check_dataset(&dataset, &index);

    let output_file = output::write_csv(&dataset, &config.output.dir)?;
    info!(
        "Pipeline finished in {:.1?}: {}/{} snapshots, {} records",
        started.elapsed(),
        succeeded,
        requested,
        dataset.len()
    );

    Ok(RunSummary {
        requested,
        succeeded,
        failed: failures,
        skipped_rows,
        warnings,
        output_file: Some(output_file),
    })
}
