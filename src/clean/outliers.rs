//! Z-score outlier filtering over numeric columns.

use tracing::debug;

use crate::model::{Row, Table};

use super::stats;

/// Rows farther than this many standard deviations from the mean are removed
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Remove rows whose value in any numeric column has `|z| > threshold`.
///
/// Columns are visited in order and each one is judged against the rows the
/// previous columns left behind, so mean and standard deviation shift as rows
/// go. A column with fewer than two values or zero spread has no outliers, and
/// a missing cell is never an outlier.
///
/// Returns the number of rows removed.
pub fn filter_outliers(table: &mut Table, threshold: f64) -> usize {
    let before = table.row_count();
    let numeric_columns = table.numeric_column_indices();

    let rows = std::mem::take(&mut table.rows);
    table.rows = numeric_columns
        .iter()
        .fold(rows, |rows, &col_idx| retain_inliers(rows, col_idx, threshold));

    let removed = before - table.row_count();
    debug!(
        "Removed {} outlier rows across {} numeric columns (|z| > {})",
        removed,
        numeric_columns.len(),
        threshold
    );
    removed
}

/// Keep the rows whose value in `col_idx` lies within `threshold` deviations
fn retain_inliers(rows: Vec<Row>, col_idx: usize, threshold: f64) -> Vec<Row> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(col_idx).and_then(|c| c.as_f64()))
        .collect();

    let (Some(mean), Some(std)) = (stats::mean(&values), stats::sample_std(&values)) else {
        return rows;
    };
    if std == 0.0 || !std.is_finite() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| match row.get(col_idx).and_then(|c| c.as_f64()) {
            Some(value) => ((value - mean) / std).abs() <= threshold,
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn single_column(values: &[i64]) -> Table {
        Table::from_rows(
            vec!["v"],
            values.iter().map(|v| vec![CellValue::Int(*v)]).collect(),
        )
    }

    fn column(table: &Table, idx: usize) -> Vec<CellValue> {
        table.column_values(idx).cloned().collect()
    }

    #[test]
    fn test_removes_far_value() {
        // Twenty small readings and one spike
        let mut values: Vec<i64> = (0..20).map(|i| 1 + i % 4).collect();
        values.push(1000);
        let mut table = single_column(&values);

        assert_eq!(filter_outliers(&mut table, DEFAULT_Z_THRESHOLD), 1);
        assert!(!column(&table, 0).contains(&CellValue::Int(1000)));

        let kept: Vec<CellValue> = values[..20].iter().map(|v| CellValue::Int(*v)).collect();
        assert_eq!(column(&table, 0), kept);
    }

    #[test]
    fn test_five_values_with_tighter_threshold() {
        // With five rows a single point can reach at most |z| = 4 / sqrt(5)
        let mut table = single_column(&[1, 2, 3, 4, 1000]);
        assert_eq!(filter_outliers(&mut table, DEFAULT_Z_THRESHOLD), 0);

        let mut table = single_column(&[1, 2, 3, 4, 1000]);
        assert_eq!(filter_outliers(&mut table, 1.5), 1);
        assert_eq!(
            column(&table, 0),
            vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3), CellValue::Int(4)]
        );
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let mut table = single_column(&[7, 7, 7, 7]);
        assert_eq!(filter_outliers(&mut table, DEFAULT_Z_THRESHOLD), 0);
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_missing_cells_are_kept() {
        let mut rows: Vec<Vec<CellValue>> =
            (0..20).map(|i| vec![CellValue::Int(10 + i % 3)]).collect();
        rows.push(vec![CellValue::Null]);
        rows.push(vec![CellValue::Int(500)]);
        let mut table = Table::from_rows(vec!["v"], rows);

        assert_eq!(filter_outliers(&mut table, DEFAULT_Z_THRESHOLD), 1);
        assert!(column(&table, 0).contains(&CellValue::Null));
    }

    #[test]
    fn test_text_columns_ignored() {
        let mut table = Table::from_rows(
            vec!["name"],
            vec![vec![CellValue::from("a")], vec![CellValue::from("zzzz")]],
        );
        assert_eq!(filter_outliers(&mut table, 0.1), 0);
    }

    #[test]
    fn test_columns_filter_sequentially() {
        // Once `a` drops its 1000 row, the 40 in `b` stands out
        let mut rows: Vec<Vec<CellValue>> = (0..19)
            .map(|i| vec![CellValue::Int(i % 2), CellValue::Int(i % 2)])
            .collect();
        rows.push(vec![CellValue::Int(0), CellValue::Int(40)]);
        rows.push(vec![CellValue::Int(1000), CellValue::Int(1000)]);
        let mut table = Table::from_rows(vec!["a", "b"], rows);

        assert_eq!(filter_outliers(&mut table, DEFAULT_Z_THRESHOLD), 2);
        assert_eq!(table.row_count(), 19);
    }
}
