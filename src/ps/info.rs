// ABOUTME: Single-container inspection without listing policy.
// ABOUTME: Returns the raw locked snapshot for one handle or one name.

use super::batch::read_snapshot;
use super::error::PsError;
use super::options::PsOptions;
use super::record::BatchContainerInfo;
use crate::runtime::{ContainerError, ContainerHandle, ContainerLookup};

/// Raw snapshot of one container, without display formatting.
///
/// Reads the pid when `opts.namespace` is set and sizes when `opts.size` is
/// set. Namespace links are not resolved and option combinations are not
/// validated.
pub fn batch_container_info(
    handle: &dyn ContainerHandle,
    opts: &PsOptions,
) -> Result<BatchContainerInfo, ContainerError> {
    let snapshot = read_snapshot(handle, opts, false)?;
    Ok(BatchContainerInfo {
        config: handle.config().clone(),
        state: snapshot.state,
        exit_code: snapshot.exit.code,
        exited: snapshot.exit.exited,
        pid: snapshot.pid,
        started_at: snapshot.started_at,
        exited_at: snapshot.exited_at,
        size: snapshot.size,
    })
}

/// Look up `name_or_id` and take its snapshot.
pub fn container_info(
    lookup: &dyn ContainerLookup,
    name_or_id: &str,
    opts: &PsOptions,
) -> Result<BatchContainerInfo, PsError> {
    let handle = lookup.lookup(name_or_id)?;
    tracing::debug!(container = %handle.id(), "reading container info");
    Ok(batch_container_info(handle.as_ref(), opts)?)
}
