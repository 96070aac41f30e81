//! Output formatting and persistence for a projection run.
//!
//! Writes the projection table as CSV, the rank file, the message file, and
//! a JSON run summary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::EngineOutput;
use crate::engine::column::AssignmentColumn;
use crate::engine::grade::GradeScale;
use crate::engine::semester::{SemesterProgress, SemesterStatus};
use crate::engine::types::{GradeTable, IDENTITY_COLUMNS, MidtermExtremes};
use crate::error::SemesterWarning;
use crate::message::StudentMessage;
use crate::stats::{ClassStatistics, Ranking};

const SEPARATOR: &str =
    "------------------------------------------------------------------------------";

/// Everything a run reports besides the per-student files.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub progress: SemesterProgress,
    pub status: SemesterStatus,
    pub latest_column: Option<AssignmentColumn>,
    pub warnings: &'a [SemesterWarning],
    pub midterm_extremes: Option<&'a [MidtermExtremes]>,
    pub statistics: &'a ClassStatistics,
}

impl<'a> RunSummary<'a> {
    pub fn new(output: &'a EngineOutput, statistics: &'a ClassStatistics) -> Self {
        Self {
            generated_at: Utc::now(),
            progress: output.progress,
            status: output.progress.status(),
            latest_column: output.projections.latest_column(),
            warnings: &output.warnings,
            midterm_extremes: output.extremes.as_deref(),
            statistics,
        }
    }
}

/// Logs a value as pretty-printed JSON at debug level, so it lands in the
/// JSON log file without flooding the terminal.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes identity columns, one projection per projected assignment, and
/// the letter for the latest projection.
pub fn write_projections(
    path: &Path,
    table: &GradeTable,
    output: &EngineOutput,
    scale: &GradeScale,
) -> Result<()> {
    let projections = &output.projections;
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header: Vec<String> = IDENTITY_COLUMNS.iter().map(|s| s.to_string()).collect();
    header.extend(projections.columns.iter().map(|c| c.to_string()));
    header.push("Letter".to_string());
    writer.write_record(&header)?;

    for (row, values) in table.rows().iter().zip(&projections.rows) {
        let s = &row.student;
        let mut record = vec![
            s.last_name.clone(),
            s.first_name.clone(),
            s.student_id.clone(),
            s.email.clone(),
        ];
        record.extend(values.iter().map(|v| format!("{v:.2}")));
        record.push(
            values
                .last()
                .map(|v| scale.letter_grade(*v).to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    debug!(path = %path.display(), rows = table.len(), "Projection table written");
    Ok(())
}

/// Writes the top and bottom student, one sentence each.
pub fn write_rank_file(path: &Path, ranking: Option<&Ranking>) -> Result<()> {
    let content = match ranking {
        Some(r) => format!(
            "The top student is {}.\nThe bottom student is {}.\n",
            r.top.full_name(),
            r.bottom.full_name()
        ),
        None => "No projection available to rank students.\n".to_string(),
    };
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Writes every message, addressed and separated, into one file.
pub fn write_messages(path: &Path, messages: &[StudentMessage]) -> Result<()> {
    let mut content = String::new();
    for m in messages {
        content.push_str(&format!("{}\n{}\n\n{}\n{SEPARATOR}\n\n", m.email, m.subject, m.body));
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(count = messages.len(), path = %path.display(), "Messages written");
    Ok(())
}

/// Writes the run summary as pretty JSON.
pub fn write_summary(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::engine::types::{Student, StudentRow};

    fn table() -> GradeTable {
        let row = |first: &str, last: &str, scores: Vec<f64>| StudentRow {
            student: Student {
                last_name: last.into(),
                first_name: first.into(),
                student_id: "9".into(),
                email: format!("{first}@example.edu"),
            },
            scores,
        };
        GradeTable::from_names(
            &["HW1", "HW2"],
            vec![
                row("Ana", "Lee", vec![100.0, 90.0]),
                row("Ben", "Ode", vec![40.0, 50.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_print_json_accepts_run_summary() {
        let out = engine::run(&table());
        let stats = ClassStatistics::compute(&table(), &out.projections);
        assert!(print_json(&RunSummary::new(&out, &stats)).is_ok());
    }

    #[test]
    fn test_write_projections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projections.csv");
        let table = table();
        let out = engine::run(&table);

        write_projections(&path, &table, &out, &GradeScale::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Last name,First name,Student ID,email,HW1,HW2,Letter");
        assert_eq!(lines[1], "Lee,Ana,9,Ana@example.edu,100.00,95.00,A-");
        assert_eq!(lines[2], "Ode,Ben,9,Ben@example.edu,40.00,45.00,F");
    }

    #[test]
    fn test_write_rank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rankfile.txt");
        let table = table();
        let out = engine::run(&table);
        let stats = ClassStatistics::compute(&table, &out.projections);

        write_rank_file(&path, stats.ranking.as_ref()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "The top student is Ana Lee.\nThe bottom student is Ben Ode.\n"
        );
    }

    #[test]
    fn test_write_summary_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let table = table();
        let out = engine::run(&table);
        let stats = ClassStatistics::compute(&table, &out.projections);

        write_summary(&path, &RunSummary::new(&out, &stats)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["latest_column"], "HW2");
        assert_eq!(value["progress"]["homeworks"], 2);
        assert_eq!(value["statistics"]["columns"][0]["column"], "HW1");
    }
}
