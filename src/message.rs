//! Per-student progress messages.
//!
//! Messages are plain values; sending them is someone else's job.

use std::fmt::Write;

use serde::Serialize;

use crate::config::ReportConfig;
use crate::engine::column::AssignmentColumn;
use crate::engine::grade::GradeScale;
use crate::engine::types::{GradeTable, ProjectionTable, StudentRow};
use crate::stats::ClassStatistics;

const TOP_LETTER: &str = "A";

const PROJECTION_NOTE: &str = "Note: These grade projections are based on default 5-point \
letter grade brackets as well as the weights for exams and homeworks indicated in the course \
syllabus. Your prior homework and exam averages are used as placeholders for the missing \
homeworks and exams, respectively. They do NOT yet incorporate extra credit for in-class \
participation, nor do they consider potential adjustments to the grade brackets. I'm providing \
the grades after each assignment to give you an idea about your progress. It is worth noting \
that grades tend to pick up after the first midterm. Please let me know if you have any \
questions or concerns.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentMessage {
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Builds messages that share one class-statistics table.
pub struct MessageComposer<'a> {
    config: &'a ReportConfig,
    scale: &'a GradeScale,
    statistics_table: String,
    update_number: usize,
    request_meeting: bool,
}

impl<'a> MessageComposer<'a> {
    pub fn new(
        config: &'a ReportConfig,
        scale: &'a GradeScale,
        statistics: &ClassStatistics,
        update_number: usize,
        request_meeting: bool,
    ) -> Self {
        Self {
            config,
            scale,
            statistics_table: statistics.render_table(),
            update_number,
            request_meeting,
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "Grade summary and projection for {} (#{})",
            self.config.course, self.update_number
        )
    }

    /// One message per row of `table`, in row order.
    pub fn compose_all(
        &self,
        table: &GradeTable,
        projections: &ProjectionTable,
    ) -> Vec<StudentMessage> {
        let latest_column = projections.latest_column();
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let latest = latest_column
                    .zip(projections.rows.get(i).and_then(|r| r.last().copied()));
                self.compose(table.columns(), row, latest)
            })
            .collect()
    }

    pub fn compose(
        &self,
        columns: &[AssignmentColumn],
        row: &StudentRow,
        latest: Option<(AssignmentColumn, f64)>,
    ) -> StudentMessage {
        let name = row.student.greeting_name();
        let mut body = String::new();

        let _ = writeln!(body, "Dear {name},\n");
        let _ = writeln!(
            body,
            "I'm writing to give you a brief update on where you stand in {}. \
             Here are the grades I have on record for you so far:\n",
            self.config.course
        );
        let _ = writeln!(body, "{}\n", own_scores(columns, &row.scores));
        let _ = writeln!(
            body,
            "In the following you can find the class statistics for each assignment/exam:\n"
        );
        let _ = writeln!(body, "{}", self.statistics_table);

        match latest {
            Some((column, projection)) => {
                let letter = self.scale.letter_grade(projection);
                let _ = writeln!(
                    body,
                    "Based on your assignment marks, I arrived at the following grade projection:"
                );
                let _ = writeln!(
                    body,
                    "Grade projection after {:<6} {:5.1} ({})\n",
                    format!("{column}:"),
                    projection,
                    letter
                );
                if letter == TOP_LETTER {
                    let _ = writeln!(
                        body,
                        "Well done - excellent job, {name}! Keep up the good work!\n"
                    );
                }
            }
            None => {
                let _ = writeln!(body, "No grade projection is available yet.\n");
            }
        }

        let _ = writeln!(body, "{PROJECTION_NOTE}\n");

        if self.request_meeting
            && latest.is_some_and(|(_, p)| p < self.config.meeting_threshold)
        {
            let _ = writeln!(
                body,
                "{name}, since you are currently not doing so great, I wanted to offer to \
                 have a meeting with you to see what we can do to improve things. \
                 Please let me know what you think.\n"
            );
        }

        let _ = writeln!(body, "Best wishes,\n{}", self.config.signature);

        StudentMessage {
            email: row.student.email.clone(),
            subject: self.subject(),
            body,
        }
    }
}

fn own_scores(columns: &[AssignmentColumn], scores: &[f64]) -> String {
    if columns.is_empty() {
        return "(no grades yet)".to_string();
    }
    columns
        .iter()
        .zip(scores)
        .map(|(c, s)| format!("{c}: {s:.1}"))
        .collect::<Vec<_>>()
        .join("  ")
}
