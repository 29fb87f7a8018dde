// ABOUTME: Output records produced by container queries.
// ABOUTME: Immutable per-container snapshots ready for display or JSON encoding.

use super::namespaces::Namespaces;
use crate::runtime::{ContainerConfig, ContainerStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Size of a container's root filesystem and top read-write layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSize {
    pub root_fs_size: i64,
    pub rw_size: i64,
}

/// One row of a container listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub image: String,
    pub command: String,
    /// Human age, e.g. `5 minutes ago`.
    pub created: String,
    pub ports: String,
    pub names: String,
    pub is_infra: bool,
    /// Display status, e.g. `Up 2 hours ago`.
    pub status: String,
    pub state: ContainerStatus,
    pub pid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ContainerSize>,
    pub pod: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub exited_at: Option<DateTime<Utc>>,
    pub labels: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Namespaces>,
    pub mounts: String,
}

/// Raw locked snapshot of a single container, without display formatting.
#[derive(Debug, Clone)]
pub struct BatchContainerInfo {
    pub config: ContainerConfig,
    pub state: ContainerStatus,
    pub exit_code: i32,
    pub exited: bool,
    pub pid: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub exited_at: Option<DateTime<Utc>>,
    pub size: Option<ContainerSize>,
}
