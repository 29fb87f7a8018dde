// ABOUTME: Status label derivation and human-readable durations for listings.
// ABOUTME: Maps every lifecycle state to exactly one display string.

use crate::runtime::ContainerStatus;
use chrono::{DateTime, Utc};

/// Timing and exit information that feeds the status label.
#[derive(Debug, Clone, Copy)]
pub struct StatusInput {
    pub state: ContainerStatus,
    pub exit_code: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub exited_at: Option<DateTime<Utc>>,
}

/// Derive the display status, e.g. `Up 3 minutes ago` or `Exited (1) 2 hours ago`.
pub fn derive_status(input: &StatusInput, now: DateTime<Utc>) -> String {
    match input.state {
        ContainerStatus::Exited | ContainerStatus::Stopped => match input.exited_at {
            Some(at) => format!("Exited ({}) {} ago", input.exit_code, since(at, now)),
            None => format!("Exited ({})", input.exit_code),
        },
        ContainerStatus::Running => match input.started_at {
            Some(at) => format!("Up {} ago", since(at, now)),
            None => "Up".to_string(),
        },
        ContainerStatus::Paused => "Paused".to_string(),
        ContainerStatus::Created | ContainerStatus::Configured => "Created".to_string(),
        ContainerStatus::Unknown | ContainerStatus::Removing => "Error".to_string(),
    }
}

/// Human duration between `then` and `now`, clamped at zero.
pub fn since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    human_duration((now - then).to_std().unwrap_or_default())
}

/// Approximate, human-friendly rendering of a duration.
pub fn human_duration(d: std::time::Duration) -> String {
    let seconds = d.as_secs();
    if seconds < 1 {
        return "Less than a second".to_string();
    }
    if seconds == 1 {
        return "1 second".to_string();
    }
    if seconds < 60 {
        return format!("{seconds} seconds");
    }

    let minutes = seconds / 60;
    if minutes == 1 {
        return "1 minute".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minutes");
    }

    // Hours round to nearest; seconds and minutes truncate.
    let hours = (d.as_secs_f64() / 3600.0 + 0.5) as u64;
    if hours == 1 {
        "1 hour".to_string()
    } else if hours < 48 {
        format!("{hours} hours")
    } else if hours < 24 * 7 * 2 {
        format!("{} days", hours / 24)
    } else if hours < 24 * 30 * 2 {
        format!("{} weeks", hours / 24 / 7)
    } else if hours < 24 * 365 * 2 {
        format!("{} months", hours / 24 / 30)
    } else {
        format!("{} years", seconds / 3600 / 24 / 365)
    }
}
