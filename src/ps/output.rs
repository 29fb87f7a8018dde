// ABOUTME: Renders container listings for terminals and scripts.
// ABOUTME: Supports an aligned table, quiet ID lists, and JSON output.

use super::options::PsOptions;
use super::record::{ContainerRecord, ContainerSize};
use crate::diagnostics::Diagnostics;
use serde::Serialize;
use std::io::{self, Write};

const COLUMN_PADDING: usize = 3;

/// How listings are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Aligned table with a header row
    Normal,
    /// One container ID per line
    Quiet,
    /// A JSON array of records
    Json,
}

/// Writes listings and their diagnostics in one mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Write `records` to `out`.
    ///
    /// The table layout follows `opts`: namespace columns replace the default
    /// ones when `opts.namespace` is set, and a size column is appended when
    /// `opts.size` is set.
    pub fn records<W: Write>(
        &self,
        out: &mut W,
        records: &[ContainerRecord],
        opts: &PsOptions,
    ) -> io::Result<()> {
        match self.mode {
            OutputMode::Normal => write_table(out, &table_rows(records, opts)),
            OutputMode::Quiet => {
                for record in records {
                    writeln!(out, "{}", record.id)?;
                }
                Ok(())
            }
            OutputMode::Json => {
                serde_json::to_writer_pretty(&mut *out, records)?;
                writeln!(out)
            }
        }
    }

    /// Write one line per collected warning to `err`.
    pub fn warnings<W: Write>(&self, err: &mut W, diagnostics: &Diagnostics) -> io::Result<()> {
        for warning in diagnostics.warnings() {
            let container = warning.container.as_ref().map(|id| id.as_str());
            match self.mode {
                OutputMode::Normal | OutputMode::Quiet => match container {
                    Some(id) => writeln!(err, "Warning: {}: {}", id, warning.message)?,
                    None => writeln!(err, "Warning: {}", warning.message)?,
                },
                OutputMode::Json => {
                    let event = JsonEvent {
                        event: "warning",
                        container,
                        message: &warning.message,
                    };
                    serde_json::to_writer(&mut *err, &event)?;
                    writeln!(err)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    container: Option<&'a str>,
    message: &'a str,
}

fn table_rows(records: &[ContainerRecord], opts: &PsOptions) -> Vec<Vec<String>> {
    let mut header: Vec<&str> = if opts.namespace {
        vec![
            "CONTAINER ID",
            "NAMES",
            "PID",
            "CGROUPNS",
            "IPC",
            "MNT",
            "NET",
            "PIDNS",
            "USERNS",
            "UTS",
        ]
    } else {
        vec![
            "CONTAINER ID",
            "IMAGE",
            "COMMAND",
            "CREATED",
            "STATUS",
            "PORTS",
            "NAMES",
        ]
    };
    if opts.size {
        header.push("SIZE");
    }

    let mut rows = vec![header.into_iter().map(String::from).collect()];
    for r in records {
        let mut row = if opts.namespace {
            let ns = r.namespaces.clone().unwrap_or_default();
            vec![
                r.id.clone(),
                r.names.clone(),
                r.pid.to_string(),
                ns.cgroup,
                ns.ipc,
                ns.mnt,
                ns.net,
                ns.pidns,
                ns.user,
                ns.uts,
            ]
        } else {
            vec![
                r.id.clone(),
                r.image.clone(),
                r.command.clone(),
                r.created.clone(),
                r.status.clone(),
                r.ports.clone(),
                r.names.clone(),
            ]
        };
        if opts.size {
            row.push(r.size.map(format_size).unwrap_or_default());
        }
        rows.push(row);
    }
    rows
}

fn write_table<W: Write>(out: &mut W, rows: &[Vec<String>]) -> io::Result<()> {
    let columns = rows.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .map(|row| row.get(col).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in rows {
        let mut line = String::new();
        for (col, cell) in row.iter().enumerate() {
            if col + 1 == row.len() {
                line.push_str(cell);
            } else {
                let width = widths[col] + COLUMN_PADDING;
                line.push_str(&format!("{:<width$}", cell, width = width));
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// `12.3kB (virtual 45.6MB)`: read-write layer first, then the whole root fs.
fn format_size(size: ContainerSize) -> String {
    format!(
        "{} (virtual {})",
        human_size(size.rw_size),
        human_size(size.root_fs_size)
    )
}

/// Decimal byte size with up to three significant digits.
fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value.abs() >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let int_digits = (value.abs().trunc() as u64).to_string().len();
    let decimals = 3usize.saturating_sub(int_digits);
    let mut number = format!("{:.*}", decimals, value);
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{}{}", number, UNITS[unit])
}
