//! Running sums per category.

use crate::engine::types::CategorySeries;

/// Running sum of `scores`; the first entry is the first score unchanged.
pub fn running_sum(scores: &[f64]) -> Vec<f64> {
    scores
        .iter()
        .scan(0.0, |acc, s| {
            *acc += s;
            Some(*acc)
        })
        .collect()
}

/// Folds every student's raw category scores into cumulative totals.
pub fn cumulate(raw: &CategorySeries) -> CategorySeries {
    CategorySeries {
        columns: raw.columns.clone(),
        rows: raw.rows.iter().map(|r| running_sum(r)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::column::AssignmentColumn;

    #[test]
    fn test_running_sum_first_entry_is_raw() {
        assert_eq!(running_sum(&[73.5]), vec![73.5]);
        assert!(running_sum(&[]).is_empty());
    }

    #[test]
    fn test_differences_recover_raw_scores() {
        let raw = [100.0, 90.0, 80.0, 70.0, 62.5, 0.0];
        let cumulative = running_sum(&raw);

        assert_eq!(cumulative[0], raw[0]);
        for k in 1..raw.len() {
            assert!((cumulative[k] - cumulative[k - 1] - raw[k]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cumulate_is_per_student() {
        let raw = CategorySeries {
            columns: vec![AssignmentColumn::Homework(1), AssignmentColumn::Homework(2)],
            rows: vec![vec![100.0, 90.0], vec![50.0, 60.0]],
        };
        let cumulative = cumulate(&raw);

        assert_eq!(cumulative.columns, raw.columns);
        assert_eq!(cumulative.rows, vec![vec![100.0, 190.0], vec![50.0, 110.0]]);
    }
}
