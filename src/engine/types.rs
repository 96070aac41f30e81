//! Data types shared by the projection pipeline.

use serde::{Deserialize, Serialize};

use crate::engine::column::{self, AssignmentColumn, Category};
use crate::error::{EngineError, Result};

/// Identity headers that precede the assignment columns, in order.
pub const IDENTITY_COLUMNS: [&str; 4] = ["Last name", "First name", "Student ID", "email"];

/// Who a row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub last_name: String,
    pub first_name: String,
    pub student_id: String,
    pub email: String,
}

impl Student {
    /// `First Last`, as used in the rank file.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// First word of the first name, or of the last name when the first
    /// name is the `.` placeholder.
    pub fn greeting_name(&self) -> &str {
        let first = self.first_name.split_whitespace().next().unwrap_or("");
        if first.is_empty() || first == "." {
            self.last_name.split_whitespace().next().unwrap_or("")
        } else {
            first
        }
    }
}

/// One student and their raw scores, aligned with the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    pub student: Student,
    pub scores: Vec<f64>,
}

/// Validated snapshot of the gradebook.
///
/// Column order is semester order; each row carries one score per column.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeTable {
    columns: Vec<AssignmentColumn>,
    rows: Vec<StudentRow>,
}

impl GradeTable {
    /// Builds a table from already-classified columns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RaggedRow`] when a row's score count differs
    /// from the column count.
    pub fn new(columns: Vec<AssignmentColumn>, rows: Vec<StudentRow>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.scores.len() != columns.len() {
                return Err(EngineError::RaggedRow {
                    row: i + 1,
                    found: row.scores.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Classifies the assignment header names, then builds the table.
    pub fn from_names<S: AsRef<str>>(names: &[S], rows: Vec<StudentRow>) -> Result<Self> {
        let columns = column::classify(names)?;
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[AssignmentColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[StudentRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: AssignmentColumn) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Raw scores of one column, top to bottom.
    pub fn column_scores(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.scores[index]).collect()
    }

    /// Raw scores restricted to one category, columns kept in order.
    pub fn category_scores(&self, category: Category) -> CategorySeries {
        let picked: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.category() == category)
            .map(|(i, _)| i)
            .collect();

        CategorySeries {
            columns: picked.iter().map(|&i| self.columns[i]).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| picked.iter().map(|&i| r.scores[i]).collect())
                .collect(),
        }
    }
}

/// Per-student values over one category's columns.
///
/// Used for raw scores, cumulative sums, and running averages alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySeries {
    pub columns: Vec<AssignmentColumn>,
    /// `rows[student][k]` belongs to `columns[k]`.
    pub rows: Vec<Vec<f64>>,
}

impl CategorySeries {
    pub fn position(&self, column: AssignmentColumn) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    pub fn value(&self, row: usize, column: AssignmentColumn) -> Option<f64> {
        let k = self.position(column)?;
        self.rows.get(row).and_then(|r| r.get(k)).copied()
    }
}

/// Lower and higher of the two midterm scores for one student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidtermExtremes {
    pub min_midterm: f64,
    pub max_midterm: f64,
}

/// Projected final percentage per student, one column per projected assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionTable {
    pub columns: Vec<AssignmentColumn>,
    /// Same row order as the source [`GradeTable`].
    pub rows: Vec<Vec<f64>>,
}

impl ProjectionTable {
    pub fn value(&self, row: usize, column: AssignmentColumn) -> Option<f64> {
        let k = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row).and_then(|r| r.get(k)).copied()
    }

    /// The most recent projected column, if any.
    pub fn latest_column(&self) -> Option<AssignmentColumn> {
        self.columns.last().copied()
    }

    /// Each student's projection in the most recent column.
    pub fn latest(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.last().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(first: &str, last: &str) -> Student {
        Student {
            last_name: last.into(),
            first_name: first.into(),
            student_id: "1".into(),
            email: "x@example.edu".into(),
        }
    }

    #[test]
    fn test_greeting_name_uses_first_token() {
        assert_eq!(student("Mary Ann", "Smith").greeting_name(), "Mary");
    }

    #[test]
    fn test_greeting_name_falls_back_to_last_name() {
        assert_eq!(student(".", "Nguyen Van").greeting_name(), "Nguyen");
    }

    #[test]
    fn test_ragged_row_rejected() {
        let rows = vec![StudentRow {
            student: student("A", "B"),
            scores: vec![90.0],
        }];
        let err = GradeTable::from_names(&["HW1", "HW2"], rows).unwrap_err();
        assert_eq!(
            err,
            EngineError::RaggedRow {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_category_scores_keeps_order() {
        let rows = vec![StudentRow {
            student: student("A", "B"),
            scores: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        }];
        let table =
            GradeTable::from_names(&["HW1", "HW2", "HW3", "HW4", "M1", "HW5"], rows).unwrap();

        let hw = table.category_scores(Category::Homework);
        assert_eq!(hw.rows, vec![vec![1.0, 2.0, 3.0, 4.0, 6.0]]);

        let exams = table.category_scores(Category::Exam);
        assert_eq!(exams.columns, vec![AssignmentColumn::Midterm(1)]);
        assert_eq!(exams.value(0, AssignmentColumn::Midterm(1)), Some(5.0));
    }
}
