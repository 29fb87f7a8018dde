// ABOUTME: Errors reported by the external container runtime.
// ABOUTME: Lookup failures and failed reads of container state.

/// Errors from runtime lookups and container reads.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("no such container: {0}")]
    NotFound(String),

    #[error("container state improper: {0}")]
    InvalidState(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ContainerError {
    /// Prefix the error message with what was being read.
    pub(crate) fn context(self, what: &str) -> Self {
        match self {
            ContainerError::NotFound(msg) => ContainerError::NotFound(msg),
            ContainerError::InvalidState(msg) => {
                ContainerError::InvalidState(format!("{what}: {msg}"))
            }
            ContainerError::Runtime(msg) => ContainerError::Runtime(format!("{what}: {msg}")),
        }
    }
}
