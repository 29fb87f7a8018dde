// ABOUTME: Value types exposed by the external container runtime.
// ABOUTME: Lifecycle status, immutable container config, port mappings, and mounts.

use crate::types::{ImageId, PodId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a container as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Unknown,
    Configured,
    Created,
    Running,
    Stopped,
    Paused,
    Exited,
    Removing,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Unknown => "unknown",
            ContainerStatus::Configured => "configured",
            ContainerStatus::Created => "created",
            ContainerStatus::Running => "running",
            ContainerStatus::Stopped => "stopped",
            ContainerStatus::Paused => "paused",
            ContainerStatus::Exited => "exited",
            ContainerStatus::Removing => "removing",
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a container status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown container status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for ContainerStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(ContainerStatus::Unknown),
            "configured" => Ok(ContainerStatus::Configured),
            "created" => Ok(ContainerStatus::Created),
            "running" => Ok(ContainerStatus::Running),
            "stopped" => Ok(ContainerStatus::Stopped),
            "paused" => Ok(ContainerStatus::Paused),
            "exited" => Ok(ContainerStatus::Exited),
            "removing" => Ok(ContainerStatus::Removing),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Exit information for a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitStatus {
    /// Exit code of the container's main process.
    pub code: i32,
    /// Whether the container has exited at least once.
    pub exited: bool,
}

/// A host port published to a container port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    /// Host IP to bind to (empty means all interfaces).
    #[serde(default)]
    pub host_ip: String,
    /// Port on the host.
    pub host_port: u16,
    /// Port inside the container.
    pub container_port: u16,
    /// Protocol name (tcp, udp, sctp).
    pub protocol: String,
}

impl PortMapping {
    pub fn new(
        host_ip: impl Into<String>,
        host_port: u16,
        container_port: u16,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            host_ip: host_ip.into(),
            host_port,
            container_port,
            protocol: protocol.into(),
        }
    }
}

/// A mount from the container's runtime spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Source path or volume name.
    pub source: String,
    /// Mount point inside the container.
    pub destination: String,
}

/// Immutable configuration recorded when the container was created.
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// ID of the image the root filesystem was built from.
    pub rootfs_image_id: ImageId,
    /// Name of the image the root filesystem was built from.
    pub rootfs_image_name: String,
    /// Command and arguments.
    pub command: Vec<String>,
    /// Pod the container belongs to, if any.
    pub pod_id: Option<PodId>,
    /// Mounts from the runtime spec.
    pub mounts: Vec<Mount>,
    /// Volumes explicitly requested by the user.
    pub user_volumes: Vec<String>,
    /// Published ports.
    pub port_mappings: Vec<PortMapping>,
    /// Whether this is a pod's infra container.
    pub is_infra: bool,
}
