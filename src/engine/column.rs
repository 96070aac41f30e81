//! Assignment column classification.
//!
//! Every header after the identity block is parsed once into an
//! [`AssignmentColumn`]. Names that are not part of the semester schedule
//! and repeated names reject the table. Column order is kept as given, so
//! grouped (`HW1..HW10, M1, M2, Final`) and interleaved layouts both work.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Homework assignments in a full semester.
pub const HOMEWORK_COUNT: u8 = 10;
/// Midterm exams in a full semester.
pub const MIDTERM_COUNT: u8 = 2;

/// One classified assignment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentColumn {
    Homework(u8),
    Midterm(u8),
    Final,
}

/// Which running series a column contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Homework,
    Exam,
}

impl AssignmentColumn {
    /// Parses a header such as `HW7`, `M2`, or `Final`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAssignmentColumn`] for anything outside
    /// `HW1`..`HW10`, `M1`, `M2`, `Final`. This is narrower than matching any
    /// name that contains `HW`: `HW11`, `M3` and similar have no stage in the
    /// projection schedule, so they are rejected rather than silently
    /// weighted.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let unknown = || EngineError::UnknownAssignmentColumn(name.to_string());

        if trimmed == "Final" {
            return Ok(Self::Final);
        }
        if let Some(n) = trimmed.strip_prefix("HW") {
            return match ordinal(n) {
                Some(n) if n <= HOMEWORK_COUNT => Ok(Self::Homework(n)),
                _ => Err(unknown()),
            };
        }
        if let Some(n) = trimmed.strip_prefix('M') {
            return match ordinal(n) {
                Some(n) if n <= MIDTERM_COUNT => Ok(Self::Midterm(n)),
                _ => Err(unknown()),
            };
        }
        Err(unknown())
    }

    pub fn category(self) -> Category {
        match self {
            Self::Homework(_) => Category::Homework,
            Self::Midterm(_) | Self::Final => Category::Exam,
        }
    }
}

fn ordinal(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u8>().ok().filter(|n| *n >= 1)
}

impl fmt::Display for AssignmentColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Homework(n) => write!(f, "HW{n}"),
            Self::Midterm(n) => write!(f, "M{n}"),
            Self::Final => f.write_str("Final"),
        }
    }
}

impl Serialize for AssignmentColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Assignment columns split by category, each in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPartition {
    pub homework: Vec<AssignmentColumn>,
    /// Midterms followed by the final.
    pub exams: Vec<AssignmentColumn>,
}

/// Classifies assignment headers, checking that each appears once.
pub fn classify<S: AsRef<str>>(names: &[S]) -> Result<Vec<AssignmentColumn>> {
    let mut seen = HashSet::new();
    let mut columns: Vec<AssignmentColumn> = Vec::with_capacity(names.len());

    for name in names {
        let column = AssignmentColumn::parse(name.as_ref())?;
        if !seen.insert(column) {
            return Err(EngineError::DuplicateAssignmentColumn(column.to_string()));
        }
        columns.push(column);
    }

    debug!(count = columns.len(), "Assignment columns classified");
    Ok(columns)
}

/// Splits classified columns into homework and exam lists.
pub fn partition(columns: &[AssignmentColumn]) -> ColumnPartition {
    let (homework, exams): (Vec<_>, Vec<_>) = columns
        .iter()
        .copied()
        .partition(|c| c.category() == Category::Homework);
    ColumnPartition { homework, exams }
}
