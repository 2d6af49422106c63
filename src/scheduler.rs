use crate::error::FetchError;
use crate::fetch::PageSource;
use crate::parser::TableParser;
use crate::types::{FailedSnapshot, SnapshotRecords, SnapshotRef};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Everything the fetch batch produced: successfully parsed snapshot
/// groups, the failure log, and the number of rows dropped by the parser.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub groups: Vec<SnapshotRecords>,
    pub failures: Vec<FailedSnapshot>,
    pub skipped_rows: usize,
}

/// Fans one fetch+parse unit per snapshot out over a bounded number of
/// in-flight requests and collects results as they complete.
///
/// Workers return values; the only mutable accumulator lives in the
/// collection loop below, so completion order never races and never leaks
/// into output order (the assembler re-sorts at the end).
pub struct ConcurrentFetchScheduler {
    max_concurrent: usize,
    batch_deadline: Option<Duration>,
}

impl ConcurrentFetchScheduler {
    pub fn new(max_concurrent: usize, batch_deadline: Option<Duration>) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            batch_deadline,
        }
    }

    pub async fn run(
        &self,
        source: Arc<dyn PageSource>,
        parser: Arc<TableParser>,
        snapshots: &[SnapshotRef],
    ) -> FetchOutcome {
        let total = snapshots.len();
        info!("Fetching {} snapshots, {} in flight", total, self.max_concurrent);

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks: JoinSet<(SnapshotRef, Result<crate::parser::ParsedSnapshot, FetchError>)> =
            JoinSet::new();

        for snapshot in snapshots.iter().cloned() {
            let source = Arc::clone(&source);
            let parser = Arc::clone(&parser);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (
                            snapshot,
                            Err(FetchError::Network("scheduler shut down".to_string())),
                        )
                    }
                };

                let result = match source.fetch(&snapshot.id).await {
                    Ok(html) => parser.parse(&html, snapshot.date),
                    Err(e) => Err(e),
                };
                (snapshot, result)
            });
        }

        let mut outcome = FetchOutcome::default();
        let mut collected: HashSet<String> = HashSet::new();

        let collect = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((snapshot, Ok(parsed))) => {
                        collected.insert(snapshot.id.clone());
                        outcome.skipped_rows += parsed.row_errors.len();
                        outcome.groups.push(SnapshotRecords {
                            snapshot_id: snapshot.id,
                            date: snapshot.date,
                            records: parsed.records,
                        });
                    }
                    Ok((snapshot, Err(e))) => {
                        warn!("Snapshot {} ({}) failed: {}", snapshot.id, snapshot.date, e);
                        collected.insert(snapshot.id.clone());
                        outcome.failures.push(FailedSnapshot {
                            snapshot_id: snapshot.id,
                            date: snapshot.date,
                            error: e,
                        });
                    }
                    Err(join_err) => {
                        error!("Fetch task aborted unexpectedly: {}", join_err);
                    }
                }

                let completed = collected.len();
                if completed % 50 == 0 || completed == total {
                    info!("Completed {}/{} snapshots", completed, total);
                }
            }
        };

        let deadline_hit = match self.batch_deadline {
            Some(deadline) => tokio::time::timeout(deadline, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };
        if deadline_hit {
            warn!(
                "Batch deadline exceeded with {}/{} snapshots collected",
                collected.len(),
                total
            );
        }

        // Anything still in flight after the deadline counts as failed.
        tasks.abort_all();
        for snapshot in snapshots {
            if !collected.contains(&snapshot.id) {
                outcome.failures.push(FailedSnapshot {
                    snapshot_id: snapshot.id.clone(),
                    date: snapshot.date,
                    error: FetchError::Network("batch deadline exceeded".to_string()),
                });
            }
        }

        info!(
            "Fetch batch done: {} parsed, {} failed, {} rows dropped",
            outcome.groups.len(),
            outcome.failures.len(),
            outcome.skipped_rows
        );
        outcome
    }
}
