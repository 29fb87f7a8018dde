// ABOUTME: Reads a process's namespace identifiers from procfs.
// ABOUTME: Resolves /proc/<pid>/ns/* links and keeps the inode inside the brackets.

use serde::Serialize;
use std::path::Path;

/// Namespace inodes of a container's main process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Namespaces {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cgroup: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ipc: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mnt: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub net: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pidns: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uts: String,
}

/// Read the namespaces of `pid` under `proc_root` (normally `/proc`).
///
/// Unreadable links yield empty strings; a process that has just exited
/// should not fail the whole listing.
pub fn read_namespaces(proc_root: &Path, pid: u32) -> Namespaces {
    let ns_dir = proc_root.join(pid.to_string()).join("ns");
    let read = |name: &str| {
        let path = ns_dir.join(name);
        match std::fs::read_link(&path) {
            Ok(target) => inside_brackets(&target.to_string_lossy()).to_string(),
            Err(e) => {
                tracing::debug!("error getting info from {}: {}", path.display(), e);
                String::new()
            }
        }
    };

    Namespaces {
        pid: pid.to_string(),
        cgroup: read("cgroup"),
        ipc: read("ipc"),
        mnt: read("mnt"),
        net: read("net"),
        pidns: read("pid"),
        user: read("user"),
        uts: read("uts"),
    }
}

/// `net:[4026531993]` becomes `4026531993`; text without brackets is kept.
fn inside_brackets(link: &str) -> &str {
    let start = link.rfind('[').map_or(0, |i| i + 1);
    let rest = &link[start..];
    match rest.find(']') {
        Some(end) => &rest[..end],
        None => rest,
    }
}
