//! Stage-dependent projection of the final course percentage.
//!
//! Each assignment column selects a [`Stage`], and each stage fixes how much
//! the homework average, the first midterm, the lower and higher midterm,
//! and the raw final contribute:
//!
//! | Column      | HW avg | M1 avg | min M | max M | Final |
//! |-------------|--------|--------|-------|-------|-------|
//! | HW1–HW4     | 1.00   |        |       |       |       |
//! | M1          | 0.20   | 0.80   |       |       |       |
//! | HW5–HW8     | 0.20   | 0.80   |       |       |       |
//! | M2          | 0.20   |        | 0.24  | 0.56  |       |
//! | HW9–HW10    | 0.20   |        | 0.24  | 0.56  |       |
//! | Final       | 0.20   |        | 0.15  | 0.35  | 0.30  |
//!
//! The homework average for an exam column is the running average of HW4
//! for M1, HW8 for M2 and HW10 for Final, looked up by name so the column
//! layout does not matter. When that homework is absent the highest-numbered
//! homework below it stands in.

use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::column::{AssignmentColumn, HOMEWORK_COUNT};
use crate::engine::types::{CategorySeries, GradeTable, MidtermExtremes, ProjectionTable};
use crate::error::SemesterWarning;

/// Point in the semester a column represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    EarlyHomework,
    FirstMidterm,
    MidHomework,
    SecondMidterm,
    LateHomework,
    FinalExam,
}

/// Blending weights for one stage. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageWeights {
    pub homework: f64,
    pub first_midterm: f64,
    pub min_midterm: f64,
    pub max_midterm: f64,
    pub final_exam: f64,
}

impl StageWeights {
    const NONE: Self = Self {
        homework: 0.0,
        first_midterm: 0.0,
        min_midterm: 0.0,
        max_midterm: 0.0,
        final_exam: 0.0,
    };

    pub fn total(&self) -> f64 {
        self.homework + self.first_midterm + self.min_midterm + self.max_midterm + self.final_exam
    }

    fn needs_extremes(&self) -> bool {
        self.min_midterm > 0.0 || self.max_midterm > 0.0
    }
}

impl Stage {
    pub fn of(column: AssignmentColumn) -> Self {
        match column {
            AssignmentColumn::Homework(1..=4) => Self::EarlyHomework,
            AssignmentColumn::Midterm(1) => Self::FirstMidterm,
            AssignmentColumn::Homework(5..=8) => Self::MidHomework,
            AssignmentColumn::Midterm(_) => Self::SecondMidterm,
            AssignmentColumn::Homework(_) => Self::LateHomework,
            AssignmentColumn::Final => Self::FinalExam,
        }
    }

    pub fn weights(self) -> StageWeights {
        match self {
            Self::EarlyHomework => StageWeights {
                homework: 1.0,
                ..StageWeights::NONE
            },
            Self::FirstMidterm | Self::MidHomework => StageWeights {
                homework: 0.20,
                first_midterm: 0.80,
                ..StageWeights::NONE
            },
            Self::SecondMidterm | Self::LateHomework => StageWeights {
                homework: 0.20,
                min_midterm: 0.24,
                max_midterm: 0.56,
                ..StageWeights::NONE
            },
            Self::FinalExam => StageWeights {
                homework: 0.20,
                min_midterm: 0.15,
                max_midterm: 0.35,
                final_exam: 0.30,
                ..StageWeights::NONE
            },
        }
    }
}

/// Inputs the projector reads; all derived from the same [`GradeTable`].
pub struct ProjectionInputs<'a> {
    pub table: &'a GradeTable,
    pub homework_average: &'a CategorySeries,
    pub exam_average: &'a CategorySeries,
    pub extremes: Option<&'a [MidtermExtremes]>,
}

/// Where one projected column takes its values from.
struct ColumnPlan {
    index: usize,
    weights: StageWeights,
    homework: Option<AssignmentColumn>,
}

/// Projects every column whose stage inputs exist in the table.
///
/// Columns whose formula needs data the table lacks are skipped and
/// reported as [`SemesterWarning::UnprojectableColumn`].
pub fn project(inputs: &ProjectionInputs<'_>) -> (ProjectionTable, Vec<SemesterWarning>) {
    let columns = inputs.table.columns();
    let has_first_midterm = inputs
        .exam_average
        .position(AssignmentColumn::Midterm(1))
        .is_some();

    let mut plans = Vec::with_capacity(columns.len());
    let mut warnings = Vec::new();

    for (index, &column) in columns.iter().enumerate() {
        let weights = Stage::of(column).weights();
        let homework = homework_reference(columns, column);

        let missing = if weights.homework > 0.0 && homework.is_none() {
            Some("homework average")
        } else if weights.first_midterm > 0.0 && !has_first_midterm {
            Some("M1 average")
        } else if weights.needs_extremes() && inputs.extremes.is_none() {
            Some("midterm extremes")
        } else {
            None
        };

        if let Some(missing) = missing {
            warn!(%column, missing, "Column cannot be projected");
            warnings.push(SemesterWarning::UnprojectableColumn { column, missing });
            continue;
        }

        plans.push(ColumnPlan {
            index,
            weights,
            homework,
        });
    }

    let rows = (0..inputs.table.len())
        .map(|row| plans.iter().map(|plan| project_cell(inputs, plan, row)).collect())
        .collect();

    let table = ProjectionTable {
        columns: plans.iter().map(|p| columns[p.index]).collect(),
        rows,
    };
    debug!(projected = table.columns.len(), "Projection table built");

    (table, warnings)
}

/// Homework whose running average feeds `column`: the column itself for
/// homework, otherwise the stage's named homework or the highest-numbered
/// one present below it.
fn homework_reference(
    columns: &[AssignmentColumn],
    column: AssignmentColumn,
) -> Option<AssignmentColumn> {
    let limit = match column {
        AssignmentColumn::Homework(n) => n,
        AssignmentColumn::Midterm(1) => 4,
        AssignmentColumn::Midterm(_) => 8,
        AssignmentColumn::Final => HOMEWORK_COUNT,
    };
    columns
        .iter()
        .filter_map(|c| match c {
            AssignmentColumn::Homework(n) if *n <= limit => Some(*n),
            _ => None,
        })
        .max()
        .map(AssignmentColumn::Homework)
}

fn project_cell(inputs: &ProjectionInputs<'_>, plan: &ColumnPlan, row: usize) -> f64 {
    let w = &plan.weights;
    let mut value = 0.0;

    if w.homework > 0.0 {
        value += w.homework * lookup(inputs.homework_average, row, plan.homework);
    }
    if w.first_midterm > 0.0 {
        value += w.first_midterm
            * lookup(inputs.exam_average, row, Some(AssignmentColumn::Midterm(1)));
    }
    if w.needs_extremes() {
        if let Some(e) = inputs.extremes.and_then(|e| e.get(row)) {
            value += w.min_midterm * e.min_midterm + w.max_midterm * e.max_midterm;
        }
    }
    if w.final_exam > 0.0 {
        value += w.final_exam * inputs.table.rows()[row].scores[plan.index];
    }

    value
}

fn lookup(series: &CategorySeries, row: usize, column: Option<AssignmentColumn>) -> f64 {
    column
        .and_then(|c| series.value(row, c))
        .unwrap_or(0.0)
}
