// ABOUTME: Batch query engine for container listings.
// ABOUTME: Filters candidates, reads each one under its lock on a bounded worker pool, and collects records.

use super::batch::build_record;
use super::error::{AbortedSnafu, PsError};
use super::filter::{compile_filters, matches_all};
use super::options::PsOptions;
use super::record::ContainerRecord;
use super::sort::sort_records;
use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::{
    ContainerError, ContainerHandle, ContainerLookup, ContainerRuntime, ContainerStatus,
};
use chrono::{DateTime, Utc};
use snafu::ResultExt;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Result of a listing query.
#[derive(Debug, Default)]
pub struct PsOutput {
    /// Records that were read successfully, in candidate order unless sorted.
    pub records: Vec<ContainerRecord>,
    /// Per-container failures that dropped a record.
    pub diagnostics: Diagnostics,
}

struct Job {
    index: usize,
    handle: Arc<dyn ContainerHandle>,
}

/// List containers from `runtime`.
///
/// Enumeration runs on the blocking pool, like every other runtime call the
/// query makes.
pub async fn list_containers<R: ContainerRuntime + 'static>(
    runtime: Arc<R>,
    filters: &[String],
    workers: usize,
    opts: &PsOptions,
) -> Result<PsOutput, PsError> {
    let enumerate = Arc::clone(&runtime);
    let handles = tokio::task::spawn_blocking(move || enumerate.all_containers())
        .await
        .context(AbortedSnafu {
            stage: "enumeration",
        })??;
    query(runtime, handles, filters, workers, opts).await
}

/// Select containers from `handles` and build a record for each.
///
/// Filters are compiled first; a bad expression fails the whole query before
/// any container is read. Compilation and matching take container locks, so
/// they run on the blocking pool. At most `workers` containers are read at
/// once. A container whose read fails is reported in the diagnostics and left
/// out of the records.
pub async fn query(
    lookup: Arc<dyn ContainerLookup>,
    handles: Vec<Arc<dyn ContainerHandle>>,
    filters: &[String],
    workers: usize,
    opts: &PsOptions,
) -> Result<PsOutput, PsError> {
    opts.validate()?;

    let filters = filters.to_vec();
    let (last, latest) = (opts.last, opts.latest);
    let candidates = tokio::task::spawn_blocking(move || {
        select_candidates(lookup.as_ref(), handles, &filters, last, latest)
    })
    .await
    .context(AbortedSnafu { stage: "selection" })??;

    tracing::debug!(
        candidates = candidates.len(),
        workers,
        "reading container batches"
    );

    let (mut records, diagnostics) = run_batches(candidates, workers, opts).await;

    if opts.running_only() {
        records.retain(|r| !r.is_infra && r.state == ContainerStatus::Running);
    }
    if let Some(key) = opts.sort {
        sort_records(&mut records, key);
    }

    Ok(PsOutput {
        records,
        diagnostics,
    })
}

/// Compile `filters` and pick the handles that pass them, each ID once.
///
/// With `latest`, filters are still compiled but only the newest handle is kept.
fn select_candidates(
    lookup: &dyn ContainerLookup,
    handles: Vec<Arc<dyn ContainerHandle>>,
    filters: &[String],
    last: i32,
    latest_only: bool,
) -> Result<Vec<Arc<dyn ContainerHandle>>, PsError> {
    let compiled = compile_filters(filters, lookup)?;
    if last > 0 {
        return Err(PsError::Unsupported {
            operation: "--last".to_string(),
        });
    }
    if latest_only {
        return Ok(vec![latest(&handles)?]);
    }

    let mut seen = HashSet::new();
    Ok(handles
        .into_iter()
        .filter(|h| matches_all(&compiled, h.as_ref()))
        .filter(|h| seen.insert(h.id().clone()))
        .collect())
}

fn latest(
    handles: &[Arc<dyn ContainerHandle>],
) -> Result<Arc<dyn ContainerHandle>, ContainerError> {
    handles
        .iter()
        .max_by_key(|h| h.created_at())
        .cloned()
        .ok_or_else(|| ContainerError::NotFound("no containers to get latest from".to_string()))
}

/// Run one batch read per candidate on a pool of `workers` tasks.
///
/// Returns the successful records in candidate order.
async fn run_batches(
    candidates: Vec<Arc<dyn ContainerHandle>>,
    workers: usize,
    opts: &PsOptions,
) -> (Vec<ContainerRecord>, Diagnostics) {
    let mut diagnostics = Diagnostics::default();
    let total = candidates.len();
    if total == 0 {
        return (Vec::new(), diagnostics);
    }

    let workers = workers.clamp(1, total);
    let now = Utc::now();
    let opts = Arc::new(opts.clone());

    // Every channel holds one slot per candidate so no send ever waits on a reader.
    let (job_tx, job_rx) = mpsc::channel::<Job>(total);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (result_tx, mut result_rx) = mpsc::channel::<(usize, ContainerRecord)>(total);
    let (warning_tx, mut warning_rx) = mpsc::channel::<Warning>(total);

    let pool: Vec<_> = (0..workers)
        .map(|worker| {
            tokio::spawn(run_worker(
                worker,
                Arc::clone(&job_rx),
                result_tx.clone(),
                warning_tx.clone(),
                Arc::clone(&opts),
                now,
            ))
        })
        .collect();
    drop(result_tx);
    drop(warning_tx);

    for (index, handle) in candidates.into_iter().enumerate() {
        if job_tx.send(Job { index, handle }).await.is_err() {
            break;
        }
    }
    drop(job_tx);

    for joined in futures::future::join_all(pool).await {
        if let Err(e) = joined {
            tracing::error!("batch worker failed: {}", e);
        }
    }

    while let Some(warning) = warning_rx.recv().await {
        diagnostics.warn(warning);
    }

    let mut indexed = Vec::with_capacity(total);
    while let Some(result) = result_rx.recv().await {
        indexed.push(result);
    }
    indexed.sort_by_key(|(index, _)| *index);

    (
        indexed.into_iter().map(|(_, record)| record).collect(),
        diagnostics,
    )
}

async fn run_worker(
    worker: usize,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    results: mpsc::Sender<(usize, ContainerRecord)>,
    warnings: mpsc::Sender<Warning>,
    opts: Arc<PsOptions>,
    now: DateTime<Utc>,
) {
    loop {
        let job = jobs.lock().await.recv().await;
        let Some(Job { index, handle }) = job else {
            break;
        };

        let id = handle.id().clone();
        tracing::trace!(worker, container = %id, "batch job started");

        let opts = Arc::clone(&opts);
        let outcome =
            tokio::task::spawn_blocking(move || build_record(handle.as_ref(), &opts, now)).await;

        // Receivers outlive every worker, so sends only fail if the query was dropped.
        match outcome {
            Ok(Ok(record)) => {
                let _ = results.send((index, record)).await;
            }
            Ok(Err(e)) => {
                let _ = warnings
                    .send(Warning::batch_read(
                        id,
                        format!("unable to get container info: {}", e),
                    ))
                    .await;
            }
            Err(e) => {
                let _ = warnings
                    .send(Warning::worker_aborted(
                        id,
                        format!("batch read did not complete: {}", e),
                    ))
                    .await;
            }
        }
    }
}
