//! Per-student lower and higher midterm once both midterms are in.

use tracing::debug;

use crate::engine::column::{AssignmentColumn, MIDTERM_COUNT};
use crate::engine::types::{GradeTable, MidtermExtremes};

/// Returns `None` until both midterm columns are present.
pub fn select_extremes(table: &GradeTable) -> Option<Vec<MidtermExtremes>> {
    let midterms = table
        .columns()
        .iter()
        .filter(|c| matches!(c, AssignmentColumn::Midterm(_)))
        .count();
    if midterms != usize::from(MIDTERM_COUNT) {
        debug!(midterms, "Midterm extremes not applicable yet");
        return None;
    }

    let m1 = table.column_index(AssignmentColumn::Midterm(1))?;
    let m2 = table.column_index(AssignmentColumn::Midterm(2))?;

    Some(
        table
            .rows()
            .iter()
            .map(|r| MidtermExtremes {
                min_midterm: r.scores[m1].min(r.scores[m2]),
                max_midterm: r.scores[m1].max(r.scores[m2]),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Student, StudentRow};

    fn row(scores: Vec<f64>) -> StudentRow {
        StudentRow {
            student: Student {
                last_name: "Doe".into(),
                first_name: "Sam".into(),
                student_id: "7".into(),
                email: "sam@example.edu".into(),
            },
            scores,
        }
    }

    #[test]
    fn test_extremes_per_student() {
        let table = GradeTable::from_names(
            &["M1", "M2"],
            vec![row(vec![80.0, 90.0]), row(vec![95.0, 70.0])],
        )
        .unwrap();

        let extremes = select_extremes(&table).unwrap();
        assert_eq!(
            extremes,
            vec![
                MidtermExtremes {
                    min_midterm: 80.0,
                    max_midterm: 90.0
                },
                MidtermExtremes {
                    min_midterm: 70.0,
                    max_midterm: 95.0
                },
            ]
        );
    }

    #[test]
    fn test_tied_midterms() {
        let table = GradeTable::from_names(&["M1", "M2"], vec![row(vec![77.0, 77.0])]).unwrap();
        let extremes = select_extremes(&table).unwrap();
        assert_eq!(extremes[0].min_midterm, 77.0);
        assert_eq!(extremes[0].max_midterm, 77.0);
    }

    #[test]
    fn test_inapplicable_with_one_midterm() {
        let table = GradeTable::from_names(
            &["HW1", "HW2", "HW3", "HW4", "M1"],
            vec![row(vec![90.0, 90.0, 90.0, 90.0, 85.0])],
        )
        .unwrap();
        assert!(select_extremes(&table).is_none());
    }
}
