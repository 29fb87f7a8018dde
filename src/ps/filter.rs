// ABOUTME: Compiles `key=value` filter expressions into container predicates.
// ABOUTME: Supports id, label, name, exited, status, ancestor, before, since, volume, and health.

use super::error::FilterError;
use crate::runtime::{ContainerHandle, ContainerLookup, ContainerStatus};
use chrono::{DateTime, Utc};

const VALID_STATUSES: [&str; 6] = ["created", "running", "paused", "stopped", "exited", "unknown"];

/// A compiled filter. A container must match every filter in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Substring of the container ID.
    Id(String),
    /// Label key, optionally with an exact value.
    Label { key: String, value: Option<String> },
    /// Substring of the container name.
    Name(String),
    /// Exited with this code.
    Exited(i32),
    /// Normalized state name (`created`, `running`, `paused`, `exited`, `unknown`).
    Status(String),
    /// Substring of the root image ID or name.
    Ancestor(String),
    /// Created strictly before this instant.
    Before(DateTime<Utc>),
    /// Created strictly after this instant.
    Since(DateTime<Utc>),
    /// Mount source, optionally with an exact destination.
    Volume {
        source: String,
        destination: Option<String>,
    },
    /// Health check status.
    Health(String),
}

impl Filter {
    /// Parse a single `key=value` expression.
    ///
    /// `before` and `since` resolve their reference container through `lookup`
    /// now, so an unknown reference fails compilation rather than matching nothing.
    pub fn parse(expr: &str, lookup: &dyn ContainerLookup) -> Result<Self, FilterError> {
        let (key, value) = expr
            .split_once('=')
            .ok_or_else(|| FilterError::InvalidFormat(expr.to_string()))?;

        match key {
            "id" => Ok(Filter::Id(value.to_string())),
            "label" => {
                let (key, value) = match value.split_once('=') {
                    Some((k, v)) => (k, (!v.is_empty()).then(|| v.to_string())),
                    None => (value, None),
                };
                Ok(Filter::Label {
                    key: key.to_string(),
                    value,
                })
            }
            "name" => Ok(Filter::Name(value.to_string())),
            "exited" => value
                .parse::<i32>()
                .map(Filter::Exited)
                .map_err(|source| FilterError::InvalidExitCode {
                    value: value.to_string(),
                    source,
                }),
            "status" => {
                if !VALID_STATUSES.contains(&value) {
                    return Err(FilterError::InvalidStatus(value.to_string()));
                }
                let wanted = if value == "stopped" { "exited" } else { value };
                Ok(Filter::Status(wanted.to_string()))
            }
            "ancestor" => Ok(Filter::Ancestor(value.to_string())),
            "before" => Ok(Filter::Before(reference_created(value, lookup)?)),
            "since" => Ok(Filter::Since(reference_created(value, lookup)?)),
            "volume" => {
                let parts: Vec<&str> = value.split(':').collect();
                let destination = match parts.as_slice() {
                    [_, dest] if !dest.is_empty() => Some(dest.to_string()),
                    _ => None,
                };
                Ok(Filter::Volume {
                    source: parts[0].to_string(),
                    destination,
                })
            }
            "health" => Ok(Filter::Health(value.to_string())),
            other => Err(FilterError::InvalidFilter(other.to_string())),
        }
    }

    /// Whether `container` satisfies this filter. Read errors count as no match.
    pub fn matches(&self, container: &dyn ContainerHandle) -> bool {
        match self {
            Filter::Id(id) => container.id().as_str().contains(id.as_str()),
            Filter::Label { key, value } => container
                .labels()
                .iter()
                .any(|(k, v)| k == key && value.as_ref().is_none_or(|want| v == want)),
            Filter::Name(name) => container.name().contains(name.as_str()),
            Filter::Exited(code) => container
                .exit_status()
                .is_ok_and(|status| status.exited && status.code == *code),
            Filter::Status(wanted) => container
                .state()
                .is_ok_and(|state| normalized_state(state) == wanted.as_str()),
            Filter::Ancestor(image) => {
                let config = container.config();
                config.rootfs_image_id.as_str().contains(image.as_str())
                    || config.rootfs_image_name.contains(image.as_str())
            }
            Filter::Before(reference) => container.created_at() < *reference,
            Filter::Since(reference) => container.created_at() > *reference,
            Filter::Volume {
                source,
                destination,
            } => container.config().mounts.iter().any(|mount| {
                mount.source == *source
                    && destination
                        .as_ref()
                        .is_none_or(|dest| mount.destination == *dest)
            }),
            Filter::Health(wanted) => container
                .health_check_status()
                .is_ok_and(|status| status == *wanted),
        }
    }
}

/// Compile every expression, stopping at the first invalid one.
pub fn compile_filters(
    exprs: &[String],
    lookup: &dyn ContainerLookup,
) -> Result<Vec<Filter>, FilterError> {
    exprs.iter().map(|expr| Filter::parse(expr, lookup)).collect()
}

/// Whether `container` satisfies every filter.
pub fn matches_all(filters: &[Filter], container: &dyn ContainerHandle) -> bool {
    filters.iter().all(|filter| filter.matches(container))
}

/// State name as the status filter sees it.
fn normalized_state(state: ContainerStatus) -> &'static str {
    match state {
        ContainerStatus::Configured => "created",
        ContainerStatus::Stopped => "exited",
        other => other.as_str(),
    }
}

fn reference_created(
    name: &str,
    lookup: &dyn ContainerLookup,
) -> Result<DateTime<Utc>, FilterError> {
    lookup
        .lookup(name)
        .map(|reference| reference.created_at())
        .map_err(|source| FilterError::ReferenceNotFound {
            name: name.to_string(),
            source,
        })
}
