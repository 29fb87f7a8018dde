// ABOUTME: Diagnostics accumulator for non-fatal failures during a query.
// ABOUTME: Collects per-container errors that drop one record but not the whole listing.

use crate::types::ContainerId;

/// Collects non-fatal warnings during a query.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        match &warning.container {
            Some(id) => tracing::warn!(container = %id, "{}", warning.message),
            None => tracing::warn!("{}", warning.message),
        }
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a query.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub container: Option<ContainerId>,
    pub message: String,
}

impl Warning {
    /// A container whose locked read failed; its record was dropped.
    pub fn batch_read(container: ContainerId, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::BatchRead,
            container: Some(container),
            message: message.into(),
        }
    }

    /// A batch job that stopped without producing a result.
    pub fn worker_aborted(container: ContainerId, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::WorkerAborted,
            container: Some(container),
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Reading a container under its lock failed.
    BatchRead,
    /// The blocking task running a batch read panicked or was cancelled.
    WorkerAborted,
}
