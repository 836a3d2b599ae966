//! Loading the exported sleep log.
//!
//! The export is the sheet's values as JSON, either the full values response
//! (`{"range": ..., "values": [[...], ...]}`) or just the array of rows. Cells
//! must be unformatted, so dates and times arrive as serial numbers.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use sleeplog_core::{ParsedLog, parse_rows, sort_chronologically};

type Rows = Vec<Vec<Value>>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Export {
    Rows(Rows),
    Values {
        #[serde(default)]
        values: Rows,
    },
}

/// Reads raw rows from any JSON export reader.
pub fn read_rows<R: Read>(reader: R) -> Result<Rows> {
    let export: Export =
        serde_json::from_reader(reader).context("sleep log export is not valid JSON rows")?;
    Ok(match export {
        Export::Rows(rows) | Export::Values { values: rows } => rows,
    })
}

/// Reads raw rows from a file, or stdin when `path` is `-`.
pub fn load_rows(path: &Path) -> Result<Rows> {
    if path == Path::new("-") {
        return read_rows(io::stdin().lock());
    }
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_rows(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses rows and sorts the surviving entries chronologically.
pub fn parse_log(rows: &[Vec<Value>], first_data_row: u32) -> ParsedLog {
    let mut log = parse_rows(rows, first_data_row);
    sort_chronologically(&mut log.entries);
    if !log.skipped.is_empty() {
        tracing::warn!(
            skipped = log.skipped.len(),
            "some sleep log rows could not be parsed; run `sleeplog check` for details"
        );
    }
    tracing::debug!(entries = log.entries.len(), "parsed sleep log");
    log
}

/// Loads, parses and sorts the log at `path`.
pub fn load(path: &Path, first_data_row: u32) -> Result<ParsedLog> {
    let rows = load_rows(path)?;
    Ok(parse_log(&rows, first_data_row))
}
