// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-memory container runtime with per-container locks and failure injection.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use ctrscope::runtime::{
    BatchOp, ContainerConfig, ContainerError, ContainerHandle, ContainerLookup, ContainerRuntime,
    ContainerStatus, ExitStatus, LockedContainer, Mount, PortMapping,
};
use ctrscope::types::{ContainerId, ImageId, PodId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("ctrscope=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Counts batch reads and the most that were ever in flight at once.
#[derive(Debug, Default)]
pub struct BatchProbe {
    active: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl BatchProbe {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    fn enter(&self) -> ProbeGuard<'_> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        ProbeGuard(self)
    }
}

struct ProbeGuard<'a>(&'a BatchProbe);

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mutable state, only reachable under the container's lock.
#[derive(Debug, Clone)]
pub struct ContainerState {
    pub status: ContainerStatus,
    pub exit: ExitStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pid: u32,
    pub root_fs_size: i64,
    pub rw_size: i64,
}

impl Default for ContainerState {
    fn default() -> Self {
        Self {
            status: ContainerStatus::Created,
            exit: ExitStatus::default(),
            started_at: None,
            finished_at: None,
            pid: 0,
            root_fs_size: 0,
            rw_size: 0,
        }
    }
}

/// Failures a container reports from inside its batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    pub state: bool,
    pub timestamps: bool,
    pub sizes: bool,
    pub ports: bool,
    pub panic: bool,
}

pub struct MemoryContainer {
    id: ContainerId,
    name: String,
    labels: HashMap<String, String>,
    created_at: DateTime<Utc>,
    config: ContainerConfig,
    health: Option<String>,
    state: Mutex<ContainerState>,
    faults: Faults,
    syncs: AtomicUsize,
    probe: Option<Arc<BatchProbe>>,
    batch_delay: std::time::Duration,
}

impl MemoryContainer {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: ContainerId::new(id),
            name: name.to_string(),
            labels: HashMap::new(),
            created_at: Utc::now() - Duration::hours(1),
            config: ContainerConfig {
                rootfs_image_id: ImageId::new("sha256:feedface"),
                rootfs_image_name: "docker.io/library/alpine:latest".to_string(),
                command: vec!["sleep".to_string(), "infinity".to_string()],
                ..Default::default()
            },
            health: None,
            state: Mutex::new(ContainerState::default()),
            faults: Faults::default(),
            syncs: AtomicUsize::new(0),
            probe: None,
            batch_delay: std::time::Duration::ZERO,
        }
    }

    /// Running since `secs` seconds ago.
    pub fn running(mut self, secs: i64) -> Self {
        let state = self.state.get_mut();
        state.status = ContainerStatus::Running;
        state.started_at = Some(Utc::now() - Duration::seconds(secs));
        state.pid = 4242;
        self
    }

    /// Exited with `code`, `secs` seconds ago.
    pub fn exited(mut self, code: i32, secs: i64) -> Self {
        let state = self.state.get_mut();
        state.status = ContainerStatus::Exited;
        state.exit = ExitStatus { code, exited: true };
        state.started_at = Some(Utc::now() - Duration::seconds(secs + 60));
        state.finished_at = Some(Utc::now() - Duration::seconds(secs));
        self
    }

    pub fn status(mut self, status: ContainerStatus) -> Self {
        self.state.get_mut().status = status;
        self
    }

    pub fn created_secs_ago(mut self, secs: i64) -> Self {
        self.created_at = Utc::now() - Duration::seconds(secs);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    pub fn image(mut self, id: &str, name: &str) -> Self {
        self.config.rootfs_image_id = ImageId::new(id);
        self.config.rootfs_image_name = name.to_string();
        self
    }

    pub fn command(mut self, argv: &[&str]) -> Self {
        self.config.command = argv.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn pod(mut self, pod: &str) -> Self {
        self.config.pod_id = Some(PodId::new(pod));
        self
    }

    pub fn infra(mut self) -> Self {
        self.config.is_infra = true;
        self
    }

    pub fn mount(mut self, source: &str, destination: &str) -> Self {
        self.config.mounts.push(Mount {
            source: source.to_string(),
            destination: destination.to_string(),
        });
        self.config
            .user_volumes
            .push(format!("{}:{}", source, destination));
        self
    }

    pub fn port(mut self, host_port: u16, container_port: u16, protocol: &str) -> Self {
        self.config.port_mappings.push(PortMapping::new(
            "",
            host_port,
            container_port,
            protocol,
        ));
        self
    }

    pub fn health(mut self, status: &str) -> Self {
        self.health = Some(status.to_string());
        self
    }

    pub fn sizes(mut self, root_fs: i64, rw: i64) -> Self {
        let state = self.state.get_mut();
        state.root_fs_size = root_fs;
        state.rw_size = rw;
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.state.get_mut().pid = pid;
        self
    }

    pub fn faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    pub fn probe(mut self, probe: &Arc<BatchProbe>, delay: std::time::Duration) -> Self {
        self.probe = Some(Arc::clone(probe));
        self.batch_delay = delay;
        self
    }

    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }
}

struct Locked<'a> {
    state: &'a ContainerState,
    faults: Faults,
    syncs: &'a AtomicUsize,
}

fn injected(what: &str) -> ContainerError {
    ContainerError::Runtime(format!("injected {} failure", what))
}

impl LockedContainer for Locked<'_> {
    fn sync(&self) -> Result<(), ContainerError> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn state(&self) -> Result<ContainerStatus, ContainerError> {
        if self.faults.state {
            return Err(injected("state"));
        }
        Ok(self.state.status)
    }

    fn exit_status(&self) -> Result<ExitStatus, ContainerError> {
        Ok(self.state.exit)
    }

    fn started_at(&self) -> Result<Option<DateTime<Utc>>, ContainerError> {
        if self.faults.timestamps {
            return Err(injected("timestamp"));
        }
        Ok(self.state.started_at)
    }

    fn finished_at(&self) -> Result<Option<DateTime<Utc>>, ContainerError> {
        if self.faults.timestamps {
            return Err(injected("timestamp"));
        }
        Ok(self.state.finished_at)
    }

    fn pid(&self) -> Result<u32, ContainerError> {
        Ok(self.state.pid)
    }

    fn root_fs_size(&self) -> Result<i64, ContainerError> {
        if self.faults.sizes {
            return Err(injected("size"));
        }
        Ok(self.state.root_fs_size)
    }

    fn rw_size(&self) -> Result<i64, ContainerError> {
        if self.faults.sizes {
            return Err(injected("size"));
        }
        Ok(self.state.rw_size)
    }
}

impl ContainerHandle for MemoryContainer {
    fn id(&self) -> &ContainerId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn health_check_status(&self) -> Result<String, ContainerError> {
        self.health
            .clone()
            .ok_or_else(|| ContainerError::InvalidState("container has no healthcheck".to_string()))
    }

    fn batch(&self, op: &mut BatchOp<'_>) -> Result<(), ContainerError> {
        let state = self.state.lock();
        let _probe = self.probe.as_ref().map(|p| p.enter());
        if !self.batch_delay.is_zero() {
            std::thread::sleep(self.batch_delay);
        }
        if self.faults.panic {
            panic!("injected panic in batch for {}", self.id);
        }
        op(&Locked {
            state: &state,
            faults: self.faults,
            syncs: &self.syncs,
        })
    }

    fn port_mappings(&self) -> Result<Vec<PortMapping>, ContainerError> {
        if self.faults.ports {
            return Err(injected("port"));
        }
        Ok(self.config.port_mappings.clone())
    }
}

/// Runtime holding a fixed set of containers.
pub struct MemoryRuntime {
    containers: Vec<Arc<MemoryContainer>>,
}

impl MemoryRuntime {
    /// Shared runtime, the way the query engine takes it.
    pub fn new(containers: Vec<MemoryContainer>) -> Arc<Self> {
        Arc::new(Self {
            containers: containers.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn handles(&self) -> Vec<Arc<dyn ContainerHandle>> {
        self.containers
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn ContainerHandle>)
            .collect()
    }

    pub fn get(&self, name: &str) -> &MemoryContainer {
        self.containers
            .iter()
            .find(|c| c.name == name)
            .expect("container exists")
    }
}

impl ContainerLookup for MemoryRuntime {
    fn lookup(&self, name_or_id: &str) -> Result<Arc<dyn ContainerHandle>, ContainerError> {
        self.containers
            .iter()
            .find(|c| c.name == name_or_id || c.id.as_str() == name_or_id)
            .or_else(|| {
                let mut prefixed = self
                    .containers
                    .iter()
                    .filter(|c| c.id.as_str().starts_with(name_or_id));
                match (prefixed.next(), prefixed.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            })
            .map(|c| Arc::clone(c) as Arc<dyn ContainerHandle>)
            .ok_or_else(|| ContainerError::NotFound(name_or_id.to_string()))
    }
}

impl ContainerRuntime for MemoryRuntime {
    fn all_containers(&self) -> Result<Vec<Arc<dyn ContainerHandle>>, ContainerError> {
        Ok(self.handles())
    }
}
