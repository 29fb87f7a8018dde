// ABOUTME: Error types for filter compilation and container queries.
// ABOUTME: FilterError uses thiserror; PsError unifies them with SNAFU and exposes a kind.

use crate::runtime::ContainerError;
use snafu::Snafu;

/// A filter expression that could not be compiled.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("filter input must be in the form of filter=value: {0} is invalid")]
    InvalidFormat(String),

    #[error("{0} is an invalid filter")]
    InvalidFilter(String),

    #[error("exited code out of range {value:?}")]
    InvalidExitCode {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("{0} is not a valid status")]
    InvalidStatus(String),

    #[error("unable to find container by name or id of {name}")]
    ReferenceNotFound {
        name: String,
        #[source]
        source: ContainerError,
    },
}

/// Unified error for listing and inspection queries.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PsError {
    #[snafu(display("invalid filter: {source}"))]
    Filter { source: FilterError },

    #[snafu(display("container lookup failed: {source}"))]
    Lookup { source: ContainerError },

    #[snafu(display("{operation} not yet supported"))]
    Unsupported { operation: String },

    #[snafu(display("invalid options: {reason}"))]
    InvalidOptions { reason: String },

    #[snafu(display("container {stage} did not complete: {source}"))]
    Aborted {
        stage: String,
        source: tokio::task::JoinError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsErrorKind {
    /// A filter expression was malformed or referenced a missing container.
    Compile,
    /// A container needed by the query does not exist.
    NotFound,
    /// The runtime failed while enumerating or reading containers.
    Runtime,
    /// The requested operation is recognized but not implemented.
    Unsupported,
    /// Options were combined in an unsupported way.
    InvalidOptions,
}

impl PsError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PsErrorKind {
        match self {
            PsError::Filter { .. } => PsErrorKind::Compile,
            PsError::Lookup { source } => match source {
                ContainerError::NotFound(_) => PsErrorKind::NotFound,
                ContainerError::InvalidState(_) | ContainerError::Runtime(_) => {
                    PsErrorKind::Runtime
                }
            },
            PsError::Unsupported { .. } => PsErrorKind::Unsupported,
            PsError::InvalidOptions { .. } => PsErrorKind::InvalidOptions,
            PsError::Aborted { .. } => PsErrorKind::Runtime,
        }
    }
}

impl From<FilterError> for PsError {
    fn from(source: FilterError) -> Self {
        PsError::Filter { source }
    }
}

impl From<ContainerError> for PsError {
    fn from(source: ContainerError) -> Self {
        PsError::Lookup { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_source() {
        let err = PsError::from(FilterError::InvalidFilter("color".to_string()));
        assert_eq!(err.kind(), PsErrorKind::Compile);

        let err = PsError::from(ContainerError::NotFound("web".to_string()));
        assert_eq!(err.kind(), PsErrorKind::NotFound);

        let err = PsError::Unsupported {
            operation: "--last".to_string(),
        };
        assert_eq!(err.kind(), PsErrorKind::Unsupported);
        assert_eq!(err.to_string(), "--last not yet supported");
    }

    #[test]
    fn filter_errors_are_wrapped_as_invalid_filter() {
        let err = PsError::from(FilterError::InvalidFormat("name".to_string()));
        assert_eq!(
            err.to_string(),
            "invalid filter: filter input must be in the form of filter=value: name is invalid"
        );
    }
}
