//! CSV reader for gradebook exports.
//!
//! Produces a validated [`GradeTable`] or fails with the first structural
//! [`EngineError`] found; nothing downstream re-checks the data.

use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::engine::column;
use crate::engine::types::{GradeTable, IDENTITY_COLUMNS, Student, StudentRow};
use crate::error::EngineError;

/// Reads and validates a gradebook CSV file.
#[tracing::instrument(fields(path = %path))]
pub fn read_gradebook(path: &str) -> Result<GradeTable> {
    let file = File::open(path).with_context(|| format!("Failed to open data file: {path}"))?;
    parse_gradebook(file)
}

/// Parses gradebook CSV from any reader.
///
/// Columns with an empty header are spreadsheet artefacts and are dropped.
///
/// # Errors
///
/// Fails with [`EngineError::MissingIdentityColumn`],
/// [`EngineError::UnknownAssignmentColumn`], [`EngineError::NonNumericScore`]
/// or another structural error wrapped in [`anyhow::Error`], or with the
/// underlying CSV error.
pub fn parse_gradebook<R: Read>(reader: R) -> Result<GradeTable> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let kept: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .collect();
    debug!(
        columns = kept.len(),
        dropped = headers.len() - kept.len(),
        "Headers read"
    );

    let identity = identity_positions(&kept)?;
    let assignments = &kept[IDENTITY_COLUMNS.len().min(kept.len())..];
    let names: Vec<&str> = assignments.iter().map(|(_, name)| *name).collect();
    let columns = column::classify(&names)?;

    // Records only need to reach the last kept column; trailing
    // empty-header cells may be present or not.
    let width = kept.last().map_or(0, |(index, _)| index + 1);

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        if record.len() < width {
            return Err(EngineError::RaggedRow {
                row,
                found: record.len(),
                expected: width,
            }
            .into());
        }
        rows.push(parse_row(&record, row, &identity, assignments)?);
    }

    let table = GradeTable::new(columns, rows)?;
    info!(
        students = table.len(),
        assignments = table.columns().len(),
        "Gradebook loaded"
    );
    Ok(table)
}

/// Record positions of the identity columns, which must be the first four.
fn identity_positions(kept: &[(usize, &str)]) -> Result<[usize; 4]> {
    let leading = &kept[..IDENTITY_COLUMNS.len().min(kept.len())];
    let mut positions = [0; 4];
    for (slot, key) in IDENTITY_COLUMNS.iter().enumerate() {
        positions[slot] = leading
            .iter()
            .find(|(_, name)| name == key)
            .map(|(index, _)| *index)
            .ok_or_else(|| EngineError::MissingIdentityColumn(key.to_string()))?;
    }
    Ok(positions)
}

fn parse_row(
    record: &StringRecord,
    row: usize,
    identity: &[usize; 4],
    assignments: &[(usize, &str)],
) -> Result<StudentRow> {
    let field = |index: usize| record.get(index).unwrap_or("").to_string();
    let student = Student {
        last_name: field(identity[0]),
        first_name: field(identity[1]),
        student_id: field(identity[2]),
        email: field(identity[3]),
    };

    let scores = assignments
        .iter()
        .map(|&(index, name)| {
            let raw = record.get(index).unwrap_or("");
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| EngineError::NonNumericScore {
                    column: name.to_string(),
                    row,
                    value: raw.to_string(),
                })
        })
        .collect::<Result<Vec<f64>, EngineError>>()?;

    Ok(StudentRow { student, scores })
}
