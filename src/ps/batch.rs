// ABOUTME: One locked read per container, turned into a display record.
// ABOUTME: Gathers state, exit info, timestamps, pid, sizes, and namespaces in a single batch.

use super::namespaces::{Namespaces, read_namespaces};
use super::options::PsOptions;
use super::ports::format_ports;
use super::record::{ContainerRecord, ContainerSize};
use super::status::{StatusInput, derive_status, since};
use crate::runtime::{ContainerError, ContainerHandle, ContainerStatus, ExitStatus};
use chrono::{DateTime, Utc};
use std::path::Path;

const CID_TRUNC_LEN: usize = 12;
const POD_TRUNC_LEN: usize = 12;
const CMD_TRUNC_LEN: usize = 17;

pub(crate) const DEFAULT_PROC_ROOT: &str = "/proc";

/// Everything read from a container while its lock was held.
pub(super) struct Snapshot {
    pub(super) state: ContainerStatus,
    pub(super) exit: ExitStatus,
    pub(super) started_at: Option<DateTime<Utc>>,
    pub(super) exited_at: Option<DateTime<Utc>>,
    pub(super) pid: u32,
    pub(super) size: Option<ContainerSize>,
    pub(super) namespaces: Option<Namespaces>,
}

/// Read a consistent snapshot of `handle` under its lock.
///
/// State, exit code, pid, and sync failures fail the read. Timestamp and size
/// failures are logged and leave the field empty.
pub(super) fn read_snapshot(
    handle: &dyn ContainerHandle,
    opts: &PsOptions,
    resolve_namespaces: bool,
) -> Result<Snapshot, ContainerError> {
    let id = handle.id();
    let proc_root = opts
        .proc_root
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_PROC_ROOT));
    let mut snapshot = None;

    handle.batch(&mut |c| {
        if opts.sync {
            c.sync()
                .map_err(|e| e.context("unable to sync container state"))?;
        }

        let state = c
            .state()
            .map_err(|e| e.context("unable to obtain container state"))?;
        let exit = c
            .exit_status()
            .map_err(|e| e.context("unable to obtain container exit code"))?;

        let started_at = c.started_at().unwrap_or_else(|e| {
            tracing::error!("error getting started time for {:?}: {}", id.as_str(), e);
            None
        });
        let exited_at = c.finished_at().unwrap_or_else(|e| {
            tracing::error!("error getting exited time for {:?}: {}", id.as_str(), e);
            None
        });

        let mut pid = 0;
        let mut namespaces = None;
        if opts.namespace {
            pid = c
                .pid()
                .map_err(|e| e.context("unable to obtain container pid"))?;
            if resolve_namespaces {
                namespaces = Some(read_namespaces(proc_root, pid));
            }
        }

        let size = opts.size.then(|| ContainerSize {
            root_fs_size: c.root_fs_size().unwrap_or_else(|e| {
                tracing::error!("error getting root fs size for {:?}: {}", id.as_str(), e);
                0
            }),
            rw_size: c.rw_size().unwrap_or_else(|e| {
                tracing::error!("error getting rw size for {:?}: {}", id.as_str(), e);
                0
            }),
        });

        snapshot = Some(Snapshot {
            state,
            exit,
            started_at,
            exited_at,
            pid,
            size,
            namespaces,
        });
        Ok(())
    })?;

    snapshot.ok_or_else(|| ContainerError::Runtime("batch operation did not run".to_string()))
}

/// Build the listing record for one container.
pub(crate) fn build_record(
    handle: &dyn ContainerHandle,
    opts: &PsOptions,
    now: DateTime<Utc>,
) -> Result<ContainerRecord, ContainerError> {
    let snapshot = read_snapshot(handle, opts, true)?;
    let config = handle.config();

    let status = derive_status(
        &StatusInput {
            state: snapshot.state,
            exit_code: snapshot.exit.code,
            started_at: snapshot.started_at,
            exited_at: snapshot.exited_at,
        },
        now,
    );

    let command = config.command.join(" ");
    let pod = config.pod_id.as_ref();
    let (id, pod, command) = if opts.no_trunc {
        (
            handle.id().to_string(),
            pod.map(|p| p.to_string()).unwrap_or_default(),
            command,
        )
    } else {
        (
            handle.id().short(CID_TRUNC_LEN).to_string(),
            pod.map(|p| p.short(POD_TRUNC_LEN).to_string())
                .unwrap_or_default(),
            truncate_command(command),
        )
    };

    let ports = match handle.port_mappings() {
        Ok(ports) => format_ports(&ports),
        Err(e) => {
            tracing::error!("unable to lookup port mappings for {}: {}", handle.id(), e);
            String::new()
        }
    };

    Ok(ContainerRecord {
        id,
        image: config.rootfs_image_name.clone(),
        command,
        created: format!("{} ago", since(handle.created_at(), now)),
        ports,
        names: handle.name().to_string(),
        is_infra: config.is_infra,
        status,
        state: snapshot.state,
        pid: snapshot.pid,
        size: snapshot.size,
        pod,
        created_at: handle.created_at(),
        started_at: snapshot.started_at,
        exited_at: snapshot.exited_at,
        labels: handle.labels().clone(),
        namespaces: snapshot.namespaces,
        mounts: config.user_volumes.join(" "),
    })
}

fn truncate_command(command: String) -> String {
    match command.char_indices().nth(CMD_TRUNC_LEN) {
        Some((idx, _)) => format!("{}...", &command[..idx]),
        None => command,
    }
}
