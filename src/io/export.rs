//! CSV appends and JSON exports.
//!
//! Appending follows one rule: a new file gets a header row, an existing file
//! must already carry exactly the expected header or nothing is written.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::domain::GoalTrackerOutcome;
use crate::error::AppError;

/// Append `records` to the CSV at `path`, creating it (and its directory) if needed.
///
/// Returns the number of rows written.
pub fn append_records<T: Serialize>(path: &Path, records: &[T], columns: &[&str]) -> Result<usize, AppError> {
    if records.is_empty() {
        return Ok(0);
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::config(format!("Failed to create directory '{}': {e}", dir.display())))?;
    }

    let needs_header = match File::open(path) {
        Ok(file) => !check_header(file, columns)
            .map_err(|msg| AppError::data(format!("{}: {msg}", path.display())))?,
        Err(_) => true,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::config(format!("Failed to open '{}' for append: {e}", path.display())))?;

    write_records(file, records, columns, needs_header)?;
    Ok(records.len())
}

/// Compare the header of an existing CSV against `columns`.
///
/// `Ok(false)` for an empty file (header still to be written), `Ok(true)` on an
/// exact match, `Err` on any difference.
pub fn check_header<R: Read>(reader: R, columns: &[&str]) -> Result<bool, String> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(false).from_reader(reader);
    let mut record = csv::StringRecord::new();
    let has_row = csv_reader
        .read_record(&mut record)
        .map_err(|e| format!("failed to read existing header: {e}"))?;
    if !has_row {
        return Ok(false);
    }

    let existing: Vec<&str> = record.iter().map(|h| h.trim().trim_start_matches('\u{feff}')).collect();
    if existing == columns {
        Ok(true)
    } else {
        Err(format!(
            "existing header [{}] does not match expected [{}]",
            existing.join(","),
            columns.join(",")
        ))
    }
}

/// Serialize records as CSV rows, optionally preceded by `columns` as a header.
pub fn write_records<W: Write, T: Serialize>(
    writer: W,
    records: &[T],
    columns: &[&str],
    write_header: bool,
) -> Result<(), AppError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    if write_header {
        csv_writer
            .write_record(columns)
            .map_err(|e| AppError::runtime(format!("Failed to write CSV header: {e}")))?;
    }
    for record in records {
        csv_writer
            .serialize(record)
            .map_err(|e| AppError::runtime(format!("Failed to write CSV row: {e}")))?;
    }
    csv_writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Write a goal-tracker outcome as pretty JSON.
pub fn write_outcome_json(path: &Path, outcome: &GoalTrackerOutcome) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create JSON export '{}': {e}", path.display())))?;
    write_outcome_json_to(file, outcome)
}

pub fn write_outcome_json_to<W: Write>(writer: W, outcome: &GoalTrackerOutcome) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, outcome)
        .map_err(|e| AppError::runtime(format!("Failed to write JSON export: {e}")))
}
