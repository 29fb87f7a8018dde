// ABOUTME: Sort keys for container listings.
// ABOUTME: Parses key names and orders records stably by the chosen field.

use super::record::ContainerRecord;
use serde::Deserialize;
use std::str::FromStr;

/// Field to order a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Command,
    Created,
    Id,
    Image,
    Names,
    RunningFor,
    Size,
    Status,
}

/// Error returned for an unrecognized sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid option for --sort, options are: command, created, id, image, names, runningfor, size, or status: {0}")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(SortKey::Command),
            "created" => Ok(SortKey::Created),
            "id" => Ok(SortKey::Id),
            "image" => Ok(SortKey::Image),
            "names" => Ok(SortKey::Names),
            "runningfor" => Ok(SortKey::RunningFor),
            "size" => Ok(SortKey::Size),
            "status" => Ok(SortKey::Status),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Stable sort of `records` by `key`, ascending.
pub fn sort_records(records: &mut [ContainerRecord], key: SortKey) {
    match key {
        SortKey::Command => records.sort_by(|a, b| a.command.cmp(&b.command)),
        SortKey::Created => records.sort_by_key(|r| r.created_at),
        SortKey::Id => records.sort_by(|a, b| a.id.cmp(&b.id)),
        SortKey::Image => records.sort_by(|a, b| a.image.cmp(&b.image)),
        SortKey::Names => records.sort_by(|a, b| a.names.cmp(&b.names)),
        SortKey::RunningFor => records.sort_by_key(|r| r.started_at),
        SortKey::Size => records.sort_by_key(|r| r.size.map_or(0, |s| s.root_fs_size)),
        SortKey::Status => records.sort_by(|a, b| a.status.cmp(&b.status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys() {
        assert_eq!("runningfor".parse(), Ok(SortKey::RunningFor));
        assert_eq!("size".parse(), Ok(SortKey::Size));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!("pid".parse::<SortKey>().is_err());
    }

    #[test]
    fn deserializes_lowercase() {
        let key: SortKey = serde_yaml::from_str("runningfor").unwrap();
        assert_eq!(key, SortKey::RunningFor);
    }
}
