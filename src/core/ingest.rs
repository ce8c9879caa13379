//! CSV ingestion for the accident dataset.
//!
//! Rows are validated here, before they reach the indexes: wrong field
//! counts, empty fields, and non-numeric severity/distance values are
//! filtered out and counted. The indexes never see a malformed record.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::common::error::CrashDbError;
use crate::core::types::AccidentRecord;

/// Field count of a well-formed data row:
/// id, severity, distance, city, state, zipcode.
const FIELDS_PER_ROW: usize = 6;

/// Result of loading a dataset: the valid records plus a count of the
/// rows that were filtered out.
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: Vec<AccidentRecord>,
    pub skipped: usize,
}

/// Parses a single comma-delimited data row into a record.
///
/// # Errors
///
/// Returns `CrashDbError::Parsing` when the row does not have exactly six
/// non-empty fields or when severity/distance fail to parse as numbers.
pub fn parse_row(line: &str) -> Result<AccidentRecord, CrashDbError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELDS_PER_ROW {
        return Err(CrashDbError::Parsing(format!(
            "expected {} fields, got {}",
            FIELDS_PER_ROW,
            fields.len()
        )));
    }
    if fields.iter().any(|f| f.is_empty()) {
        return Err(CrashDbError::Parsing("row has an empty field".to_string()));
    }

    let severity: i32 = fields[1]
        .parse()
        .map_err(|e| CrashDbError::Parsing(format!("severity '{}': {}", fields[1], e)))?;
    let distance: f64 = fields[2]
        .parse()
        .map_err(|e| CrashDbError::Parsing(format!("distance '{}': {}", fields[2], e)))?;

    Ok(AccidentRecord::new(fields[0], severity, distance, fields[3], fields[4], fields[5]))
}

/// Loads a dataset file, skipping the header row and filtering out
/// malformed rows. Malformed rows are counted, not fatal; only I/O
/// failures abort the load.
///
/// # Errors
///
/// Returns `CrashDbError::Io` when the file cannot be opened or read.
pub fn load_records(path: &Path) -> Result<LoadOutcome, CrashDbError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut skipped = 0;
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line_number == 0 {
            continue; // header
        }
        match parse_row(&line) {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }

    Ok(LoadOutcome { records, skipped })
}
