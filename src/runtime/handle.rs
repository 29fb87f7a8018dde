// ABOUTME: Capability traits the external container runtime implements.
// ABOUTME: Per-container handles with a locked batch read, plus lookup and listing.

use super::error::ContainerError;
use super::types::{ContainerConfig, ContainerStatus, ExitStatus, PortMapping};
use crate::types::ContainerId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Read access to a container while its lock is held.
///
/// Only reachable from inside [`ContainerHandle::batch`], so every value read
/// through it belongs to the same consistent snapshot.
pub trait LockedContainer {
    /// Refresh state from the OCI runtime before reading.
    fn sync(&self) -> Result<(), ContainerError>;

    fn state(&self) -> Result<ContainerStatus, ContainerError>;

    fn exit_status(&self) -> Result<ExitStatus, ContainerError>;

    /// When the container last started, if it ever did.
    fn started_at(&self) -> Result<Option<DateTime<Utc>>, ContainerError>;

    /// When the container last finished, if it ever did.
    fn finished_at(&self) -> Result<Option<DateTime<Utc>>, ContainerError>;

    fn pid(&self) -> Result<u32, ContainerError>;

    /// Size of the root filesystem in bytes.
    fn root_fs_size(&self) -> Result<i64, ContainerError>;

    /// Size of the top read-write layer in bytes.
    fn rw_size(&self) -> Result<i64, ContainerError>;
}

/// Closure run under a container's lock.
pub type BatchOp<'a> = dyn FnMut(&dyn LockedContainer) -> Result<(), ContainerError> + 'a;

/// Reference to one container owned by the runtime.
///
/// Identity, labels, and config are immutable after creation and can be read
/// without locking. Mutable state is only reachable through [`batch`](Self::batch).
pub trait ContainerHandle: Send + Sync {
    fn id(&self) -> &ContainerId;

    fn name(&self) -> &str;

    fn labels(&self) -> &HashMap<String, String>;

    fn created_at(&self) -> DateTime<Utc>;

    fn config(&self) -> &ContainerConfig;

    /// Status string of the most recent health check.
    fn health_check_status(&self) -> Result<String, ContainerError>;

    /// Run `op` while holding this container's lock.
    ///
    /// The lock is per container; batches on different containers run in parallel.
    fn batch(&self, op: &mut BatchOp<'_>) -> Result<(), ContainerError>;

    /// Published ports, resolved through the network namespace owner if needed.
    fn port_mappings(&self) -> Result<Vec<PortMapping>, ContainerError> {
        Ok(self.config().port_mappings.clone())
    }

    /// Lifecycle state, read under the lock.
    fn state(&self) -> Result<ContainerStatus, ContainerError> {
        let mut state = ContainerStatus::Unknown;
        self.batch(&mut |c| {
            state = c.state()?;
            Ok(())
        })?;
        Ok(state)
    }

    /// Exit information, read under the lock.
    fn exit_status(&self) -> Result<ExitStatus, ContainerError> {
        let mut status = ExitStatus::default();
        self.batch(&mut |c| {
            status = c.exit_status()?;
            Ok(())
        })?;
        Ok(status)
    }
}

/// Resolves a container by name or ID.
pub trait ContainerLookup: Send + Sync {
    fn lookup(&self, name_or_id: &str) -> Result<Arc<dyn ContainerHandle>, ContainerError>;
}

/// A runtime that can also enumerate its containers.
pub trait ContainerRuntime: ContainerLookup {
    fn all_containers(&self) -> Result<Vec<Arc<dyn ContainerHandle>>, ContainerError>;
}
