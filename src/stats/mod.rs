//! Class statistics built from raw scores and the projection table.
//!
//! These are the final reduction over the whole class, so they run only
//! after every row has been projected.

pub mod utility;

use std::fmt::Write;

use serde::Serialize;
use tracing::debug;

use crate::engine::column::AssignmentColumn;
use crate::engine::types::{GradeTable, ProjectionTable, Student};
use crate::stats::utility::{mean, quantile, sample_stddev};

/// Bins used for the class-average histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Descriptive statistics of one assignment column's raw scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: AssignmentColumn,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_scores(column: AssignmentColumn, scores: &[f64]) -> Self {
        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let avg = mean(&sorted);

        Self {
            column,
            count: sorted.len(),
            mean: avg,
            std: sample_stddev(&sorted, avg),
            min: sorted.first().copied().unwrap_or(0.0),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(0.0),
        }
    }
}

/// Top and bottom student by the latest projection column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub column: AssignmentColumn,
    pub top: Student,
    pub top_projection: f64,
    pub bottom: Student,
    pub bottom_projection: f64,
}

/// Counts of latest projections per equal-width bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub low: f64,
    pub high: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

/// Complete statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStatistics {
    pub columns: Vec<ColumnSummary>,
    pub ranking: Option<Ranking>,
    pub class_average: Option<f64>,
    pub histogram: Option<Histogram>,
}

impl ClassStatistics {
    #[tracing::instrument(skip_all, fields(students = table.len()))]
    pub fn compute(table: &GradeTable, projections: &ProjectionTable) -> Self {
        let columns = describe(table);
        let latest = projections.latest();
        let class_average = (!latest.is_empty()).then(|| mean(&latest));
        let ranking = rank(table, projections);
        let histogram = histogram(&latest, HISTOGRAM_BINS);

        debug!(
            summaries = columns.len(),
            class_average = class_average.unwrap_or_default(),
            "Class statistics computed"
        );

        Self {
            columns,
            ranking,
            class_average,
            histogram,
        }
    }

    /// Fixed-width table with one column per assignment and one row per
    /// statistic, in the layout students see in their message.
    pub fn render_table(&self) -> String {
        let mut output = String::new();

        let _ = write!(output, "{:<6}", "");
        for summary in &self.columns {
            let _ = write!(output, " {:>7}", summary.column.to_string());
        }
        let _ = writeln!(output);

        let rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];
        for (label, value) in rows {
            let _ = write!(output, "{:<6}", label);
            for summary in &self.columns {
                let _ = write!(output, " {:7.2}", value(summary));
            }
            let _ = writeln!(output);
        }

        output
    }
}

/// One [`ColumnSummary`] per assignment column, in table order.
pub fn describe(table: &GradeTable) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, &column)| ColumnSummary::from_scores(column, &table.column_scores(i)))
        .collect()
}

/// Highest and lowest latest projection; ties go to the earlier row.
pub fn rank(table: &GradeTable, projections: &ProjectionTable) -> Option<Ranking> {
    let column = projections.latest_column()?;
    let latest = projections.latest();

    let mut top: Option<(usize, f64)> = None;
    let mut bottom: Option<(usize, f64)> = None;
    for (i, &value) in latest.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if top.is_none_or(|(_, best)| value > best) {
            top = Some((i, value));
        }
        if bottom.is_none_or(|(_, worst)| value < worst) {
            bottom = Some((i, value));
        }
    }

    let (top_row, top_projection) = top?;
    let (bottom_row, bottom_projection) = bottom?;
    let rows = table.rows();

    Some(Ranking {
        column,
        top: rows[top_row].student.clone(),
        top_projection,
        bottom: rows[bottom_row].student.clone(),
        bottom_projection,
    })
}

/// Equal-width histogram over the observed range. A single distinct value
/// is centred in a unit-wide range.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return None;
    }

    let mut low = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }
    let bin_width = (high - low) / bins as f64;

    let mut counts = vec![0; bins];
    for v in finite {
        let bin = (((v - low) / bin_width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Some(Histogram {
        low,
        high,
        bin_width,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::StudentRow;

    fn row(first: &str, last: &str, scores: Vec<f64>) -> StudentRow {
        StudentRow {
            student: Student {
                last_name: last.into(),
                first_name: first.into(),
                student_id: format!("{first}{last}"),
                email: format!("{first}@example.edu"),
            },
            scores,
        }
    }

    fn sample_table() -> GradeTable {
        GradeTable::from_names(
            &["HW1", "HW2"],
            vec![
                row("Ana", "Lee", vec![100.0, 80.0]),
                row("Ben", "Ode", vec![60.0, 70.0]),
                row("Cy", "Poe", vec![80.0, 90.0]),
                row("Di", "Qi", vec![90.0, 60.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_describe_column() {
        let summaries = describe(&sample_table());
        assert_eq!(summaries.len(), 2);

        let hw1 = &summaries[0];
        assert_eq!(hw1.column, AssignmentColumn::Homework(1));
        assert_eq!(hw1.count, 4);
        assert_eq!(hw1.mean, 82.5);
        assert_eq!(hw1.min, 60.0);
        assert_eq!(hw1.q25, 75.0);
        assert_eq!(hw1.median, 85.0);
        assert_eq!(hw1.q75, 92.5);
        assert_eq!(hw1.max, 100.0);
        assert!((hw1.std - 17.0782512765993).abs() < 1e-9);
    }

    #[test]
    fn test_rank_by_latest_projection() {
        let table = sample_table();
        let projections = ProjectionTable {
            columns: vec![AssignmentColumn::Homework(1), AssignmentColumn::Homework(2)],
            rows: vec![
                vec![100.0, 90.0],
                vec![60.0, 65.0],
                vec![80.0, 85.0],
                vec![90.0, 75.0],
            ],
        };

        let ranking = rank(&table, &projections).unwrap();
        assert_eq!(ranking.column, AssignmentColumn::Homework(2));
        assert_eq!(ranking.top.full_name(), "Ana Lee");
        assert_eq!(ranking.top_projection, 90.0);
        assert_eq!(ranking.bottom.full_name(), "Ben Ode");
        assert_eq!(ranking.bottom_projection, 65.0);
    }

    #[test]
    fn test_rank_ties_go_to_first_row() {
        let table = sample_table();
        let projections = ProjectionTable {
            columns: vec![AssignmentColumn::Homework(1)],
            rows: vec![vec![70.0]; 4],
        };
        let ranking = rank(&table, &projections).unwrap();
        assert_eq!(ranking.top.first_name, "Ana");
        assert_eq!(ranking.bottom.first_name, "Ana");
    }

    #[test]
    fn test_rank_without_projection() {
        assert!(rank(&sample_table(), &ProjectionTable::default()).is_none());
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let h = histogram(&values, 5).unwrap();
        assert_eq!(h.low, 50.0);
        assert_eq!(h.high, 100.0);
        assert_eq!(h.bin_width, 10.0);
        assert_eq!(h.counts, vec![1, 1, 1, 1, 2]);
    }

    #[test]
    fn test_histogram_single_value() {
        let h = histogram(&[75.0, 75.0], 2).unwrap();
        assert_eq!((h.low, h.high), (74.5, 75.5));
        assert_eq!(h.counts, vec![0, 2]);
        assert!(histogram(&[], 20).is_none());
    }

    #[test]
    fn test_compute_and_render() {
        let table = sample_table();
        let projections = ProjectionTable {
            columns: vec![AssignmentColumn::Homework(1)],
            rows: vec![vec![100.0], vec![60.0], vec![80.0], vec![90.0]],
        };
        let stats = ClassStatistics::compute(&table, &projections);
        assert_eq!(stats.class_average, Some(82.5));

        let rendered = stats.render_table();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("HW1") && lines[0].contains("HW2"));
        assert!(lines[2].starts_with("mean") && lines[2].contains("82.50"));
    }
}
