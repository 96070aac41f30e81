//! Grade projection engine.
//!
//! Pure computation over a validated [`GradeTable`]: assignment columns are
//! classified once at construction, then folded left to right into
//! cumulative sums and running averages per category, midterm extremes are
//! selected once both midterms exist, and the stage-weighted projector
//! produces the projected final percentage for every column. No I/O happens
//! here.

pub mod average;
pub mod column;
pub mod cumulative;
pub mod extremes;
pub mod grade;
pub mod projector;
pub mod semester;
pub mod types;

use tracing::{debug, info, warn};

use crate::engine::column::{Category, ColumnPartition};
use crate::engine::projector::ProjectionInputs;
use crate::engine::semester::SemesterProgress;
use crate::engine::types::{CategorySeries, GradeTable, MidtermExtremes, ProjectionTable};
use crate::error::SemesterWarning;

/// Cumulative and running-average series of one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    pub cumulative: CategorySeries,
    pub average: CategorySeries,
}

impl CategoryTotals {
    fn from_table(table: &GradeTable, category: Category) -> Self {
        let cumulative = cumulative::cumulate(&table.category_scores(category));
        let average = average::average(&cumulative);
        Self {
            cumulative,
            average,
        }
    }
}

/// Everything derived from one [`GradeTable`] snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub partition: ColumnPartition,
    pub progress: SemesterProgress,
    pub homework: CategoryTotals,
    pub exams: CategoryTotals,
    /// Present only once both midterms are in.
    pub extremes: Option<Vec<MidtermExtremes>>,
    pub projections: ProjectionTable,
    pub warnings: Vec<SemesterWarning>,
}

/// Runs the whole projection pipeline.
#[tracing::instrument(skip_all, fields(students = table.len(), columns = table.columns().len()))]
pub fn run(table: &GradeTable) -> EngineOutput {
    let partition = column::partition(table.columns());
    let progress = SemesterProgress::from_columns(table.len(), table.columns());
    info!(
        homeworks = progress.homeworks,
        midterms = progress.midterms,
        finals = progress.finals,
        "{}",
        progress.summary()
    );

    let mut warnings = Vec::new();
    if let Some(warning) = progress.warning() {
        warn!(%warning, "Semester data incomplete, projecting what is present");
        warnings.push(warning);
    }

    let homework = CategoryTotals::from_table(table, Category::Homework);
    let exams = CategoryTotals::from_table(table, Category::Exam);
    debug!(
        homework_columns = homework.average.columns.len(),
        exam_columns = exams.average.columns.len(),
        "Running averages computed"
    );

    let extremes = extremes::select_extremes(table);

    let (projections, skipped) = projector::project(&ProjectionInputs {
        table,
        homework_average: &homework.average,
        exam_average: &exams.average,
        extremes: extremes.as_deref(),
    });
    warnings.extend(skipped);

    info!(
        projected_columns = projections.columns.len(),
        latest = ?projections.latest_column().map(|c| c.to_string()),
        "Projection table built"
    );

    EngineOutput {
        partition,
        progress,
        homework,
        exams,
        extremes,
        projections,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::column::AssignmentColumn;
    use crate::engine::types::{Student, StudentRow};

    fn row(first: &str, scores: Vec<f64>) -> StudentRow {
        StudentRow {
            student: Student {
                last_name: "Tester".into(),
                first_name: first.into(),
                student_id: first.to_lowercase(),
                email: format!("{}@example.edu", first.to_lowercase()),
            },
            scores,
        }
    }

    #[test]
    fn test_run_mid_semester() {
        let table = GradeTable::from_names(
            &["HW1", "HW2", "HW3", "HW4", "M1", "HW5", "HW6"],
            vec![
                row("Ana", vec![100.0, 90.0, 80.0, 70.0, 92.0, 80.0, 90.0]),
                row("Ben", vec![60.0, 60.0, 60.0, 60.0, 50.0, 60.0, 60.0]),
            ],
        )
        .unwrap();

        let out = run(&table);

        assert_eq!(out.partition.homework.len(), 6);
        assert_eq!(out.partition.exams, vec![AssignmentColumn::Midterm(1)]);
        assert!(out.extremes.is_none());
        assert!(out.warnings.is_empty());
        assert_eq!(out.projections.columns, table.columns().to_vec());
        assert_eq!(
            out.homework.cumulative.rows[0],
            vec![100.0, 190.0, 270.0, 340.0, 420.0, 510.0]
        );

        // HW6 average 85 for Ana
        let hw6 = out.projections.value(0, AssignmentColumn::Homework(6)).unwrap();
        assert!((hw6 - (0.2 * 85.0 + 0.8 * 92.0)).abs() < 1e-9);

        let ben = out.projections.latest()[1];
        assert!((ben - (0.2 * 60.0 + 0.8 * 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_run_reports_incomplete_semester() {
        let table = GradeTable::from_names(
            &["HW1", "M1", "M2", "Final"],
            vec![row("Cy", vec![90.0, 80.0, 70.0, 60.0])],
        )
        .unwrap();

        let out = run(&table);

        assert!(matches!(
            out.warnings[0],
            SemesterWarning::IncompleteSemesterState { homeworks: 1, .. }
        ));
        assert_eq!(out.projections.latest_column(), Some(AssignmentColumn::Final));
        let expected = 0.2 * 90.0 + 0.15 * 70.0 + 0.35 * 80.0 + 0.30 * 60.0;
        assert!((out.projections.latest()[0] - expected).abs() < 1e-9);
    }
}
