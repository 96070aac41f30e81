//! Running averages from cumulative sums.

use crate::engine::column::AssignmentColumn;
use crate::engine::types::CategorySeries;

/// The final counts as the third exam unit, however many midterms exist.
pub const FINAL_DIVISOR: f64 = 3.0;

/// Divisor applied to a column's cumulative score.
///
/// | Column | Divisor |
/// |--------|---------|
/// | `HWn`  | n       |
/// | `Mn`   | n       |
/// | `Final`| 3       |
pub fn divisor(column: AssignmentColumn) -> f64 {
    match column {
        AssignmentColumn::Homework(n) | AssignmentColumn::Midterm(n) => f64::from(n.max(1)),
        AssignmentColumn::Final => FINAL_DIVISOR,
    }
}

/// Divides each cumulative entry by its column's divisor.
pub fn running_average(columns: &[AssignmentColumn], cumulative: &[f64]) -> Vec<f64> {
    columns
        .iter()
        .zip(cumulative)
        .map(|(c, total)| total / divisor(*c))
        .collect()
}

pub fn average(cumulative: &CategorySeries) -> CategorySeries {
    CategorySeries {
        columns: cumulative.columns.clone(),
        rows: cumulative
            .rows
            .iter()
            .map(|r| running_average(&cumulative.columns, r))
            .collect(),
    }
}
