//! Error and warning types for the projection engine.

use serde::Serialize;
use thiserror::Error;

use crate::engine::column::AssignmentColumn;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Structural problems that reject a grade table before any projection runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// One of the four identity columns is absent
    #[error("identity column `{0}` missing in data structure")]
    MissingIdentityColumn(String),

    /// Column name is not a homework, midterm, or final
    #[error("unknown assignment column `{0}`")]
    UnknownAssignmentColumn(String),

    /// The same assignment appears more than once
    #[error("duplicate assignment column `{0}`")]
    DuplicateAssignmentColumn(String),

    /// Score cell that does not parse as a number
    #[error("unknown grade format in column `{column}` (row {row}): {value:?}")]
    NonNumericScore {
        column: String,
        row: usize,
        value: String,
    },

    /// Row width disagrees with the header
    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// Grade scale brackets overlap, leave gaps, or are malformed
    #[error("invalid grade scale: {0}")]
    InvalidGradeScale(String),
}

/// Non-fatal findings reported next to the engine output.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SemesterWarning {
    /// Final exam is in but some homework or midterm is missing
    #[error("{homeworks}/10 HWs, {midterms}/2 midterms, {finals}/1 final exam: missing data")]
    IncompleteSemesterState {
        homeworks: usize,
        midterms: usize,
        finals: usize,
    },

    /// Stage formula references an input this table does not contain
    #[error("no projection for {column}: {missing} not available")]
    UnprojectableColumn {
        column: AssignmentColumn,
        missing: &'static str,
    },
}
