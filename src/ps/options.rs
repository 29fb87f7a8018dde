// ABOUTME: Options controlling a container listing query.
// ABOUTME: Selection (all, latest, last), enrichment (size, namespaces), truncation, and sort key.

use super::error::PsError;
use super::sort::SortKey;
use std::path::PathBuf;

/// Options for a listing query.
#[derive(Debug, Clone, Default)]
pub struct PsOptions {
    /// Include containers in every state, not only running ones.
    pub all: bool,
    /// Show only the last N created containers. Positive values are rejected.
    pub last: i32,
    /// Show only the most recently created container, ignoring filters.
    pub latest: bool,
    /// Keep full IDs and commands.
    pub no_trunc: bool,
    /// Read namespace information for each container.
    pub namespace: bool,
    /// Read root filesystem and read-write layer sizes.
    pub size: bool,
    /// Order of the returned records.
    pub sort: Option<SortKey>,
    /// Refresh state from the OCI runtime before reading.
    pub sync: bool,
    /// procfs mount used to resolve namespaces. Defaults to `/proc`.
    pub proc_root: Option<PathBuf>,
}

impl PsOptions {
    /// Reject option combinations that cannot be served together.
    pub fn validate(&self) -> Result<(), PsError> {
        if self.namespace && self.size {
            return Err(PsError::InvalidOptions {
                reason: "namespace and size cannot be used together".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the default running-only view applies.
    pub(crate) fn running_only(&self) -> bool {
        !self.all && !self.latest && self.last < 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_is_running_only() {
        assert!(PsOptions::default().running_only());
    }

    #[test]
    fn all_and_latest_widen_the_view() {
        let all = PsOptions {
            all: true,
            ..Default::default()
        };
        let latest = PsOptions {
            latest: true,
            ..Default::default()
        };
        assert!(!all.running_only());
        assert!(!latest.running_only());
    }

    #[test]
    fn namespace_with_size_is_rejected() {
        let opts = PsOptions {
            namespace: true,
            size: true,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
