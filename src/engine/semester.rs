//! How far into the semester the gradebook is.

use serde::Serialize;

use crate::engine::column::{AssignmentColumn, HOMEWORK_COUNT, MIDTERM_COUNT};
use crate::error::SemesterWarning;

/// Assignment counts against the full schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SemesterProgress {
    pub students: usize,
    pub homeworks: usize,
    pub midterms: usize,
    pub finals: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SemesterStatus {
    /// No final exam data yet.
    InProgress,
    /// Every homework, both midterms, and the final are in.
    Complete,
    /// Final is in but something before it is missing.
    Incomplete,
}

impl SemesterProgress {
    pub fn from_columns(students: usize, columns: &[AssignmentColumn]) -> Self {
        let mut progress = Self {
            students,
            ..Self::default()
        };
        for column in columns {
            match column {
                AssignmentColumn::Homework(_) => progress.homeworks += 1,
                AssignmentColumn::Midterm(_) => progress.midterms += 1,
                AssignmentColumn::Final => progress.finals += 1,
            }
        }
        progress
    }

    pub fn status(&self) -> SemesterStatus {
        if self.finals == 0 {
            SemesterStatus::InProgress
        } else if self.homeworks == usize::from(HOMEWORK_COUNT)
            && self.midterms == usize::from(MIDTERM_COUNT)
        {
            SemesterStatus::Complete
        } else {
            SemesterStatus::Incomplete
        }
    }

    /// Warning for a final that arrived ahead of the rest of the semester.
    pub fn warning(&self) -> Option<SemesterWarning> {
        (self.status() == SemesterStatus::Incomplete).then_some(
            SemesterWarning::IncompleteSemesterState {
                homeworks: self.homeworks,
                midterms: self.midterms,
                finals: self.finals,
            },
        )
    }

    /// Number of graded assignments so far, shown as the update number.
    pub fn update_number(&self) -> usize {
        self.homeworks + self.midterms + self.finals
    }

    /// One-line summary for the run log.
    pub fn summary(&self) -> String {
        match self.status() {
            SemesterStatus::InProgress => format!(
                "{}/{} HWs done, {}/{} midterms done, no final exam data yet",
                self.homeworks, HOMEWORK_COUNT, self.midterms, MIDTERM_COUNT
            ),
            SemesterStatus::Complete => format!(
                "{}/{} HWs, {}/{} midterms, {}/1 final exam: all grades are in",
                self.homeworks, HOMEWORK_COUNT, self.midterms, MIDTERM_COUNT, self.finals
            ),
            SemesterStatus::Incomplete => format!(
                "{}/{} HWs, {}/{} midterms, {}/1 final exam: missing data",
                self.homeworks, HOMEWORK_COUNT, self.midterms, MIDTERM_COUNT, self.finals
            ),
        }
    }
}
