//! Missing value repair: imputation, constant fill, or row removal.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::MissingStrategy;
use crate::error::{CleanError, Result};
use crate::model::{CellValue, Table};

use super::stats;

/// What the missing value step changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MissingReport {
    pub cells_filled: usize,
    pub rows_dropped: usize,
}

/// Repair missing cells in place according to `strategy`.
///
/// `Mean` and `Median` only touch numeric columns; `Mode` and `Fill` touch every
/// column; `Drop` removes each row holding a missing cell. `Fill` without a value
/// is rejected with [`CleanError::InvalidStrategy`].
pub fn handle_missing_values(
    table: &mut Table,
    strategy: MissingStrategy,
    fill_value: Option<&CellValue>,
) -> Result<MissingReport> {
    let report = match strategy {
        MissingStrategy::Mean => fill_numeric(table, stats::mean),
        MissingStrategy::Median => fill_numeric(table, stats::median),
        MissingStrategy::Mode => {
            let modes = (0..table.column_count())
                .map(|col_idx| column_mode(table, col_idx))
                .collect();
            fill_columns(table, modes)
        }
        MissingStrategy::Fill => {
            let value = match fill_value {
                Some(value) if !value.is_null() => value,
                _ => {
                    return Err(CleanError::InvalidStrategy(
                        "fill requires a fill value".to_string(),
                    ))
                }
            };
            let fills = vec![Some(value.clone()); table.column_count()];
            fill_columns(table, fills)
        }
        MissingStrategy::Drop => {
            let before = table.row_count();
            table.rows.retain(|row| !row.has_missing());
            MissingReport {
                cells_filled: 0,
                rows_dropped: before - table.row_count(),
            }
        }
    };

    table.infer_column_types();
    debug!(
        "Missing values ({}): {} cells filled, {} rows dropped",
        strategy, report.cells_filled, report.rows_dropped
    );
    Ok(report)
}

/// Fill numeric columns with a statistic of their non-missing values
fn fill_numeric(table: &mut Table, stat: fn(&[f64]) -> Option<f64>) -> MissingReport {
    let fills = table
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, col)| {
            if col.is_numeric() {
                stat(&table.numeric_values(col_idx)).map(CellValue::Float)
            } else {
                None
            }
        })
        .collect();
    fill_columns(table, fills)
}

/// Replace missing cells column by column; `None` leaves a column untouched
fn fill_columns(table: &mut Table, fills: Vec<Option<CellValue>>) -> MissingReport {
    let mut report = MissingReport::default();
    for row in &mut table.rows {
        for (cell, fill) in row.cells.iter_mut().zip(&fills) {
            match fill {
                Some(value) if cell.is_null() => {
                    *cell = value.clone();
                    report.cells_filled += 1;
                }
                _ => {}
            }
        }
    }
    report
}

/// Most frequent non-missing value; ties go to the smallest value
fn column_mode(table: &Table, col_idx: usize) -> Option<CellValue> {
    let mut counts: FxHashMap<&CellValue, usize> = FxHashMap::default();
    for cell in table.column_values(col_idx).filter(|c| !c.is_null()) {
        *counts.entry(cell).or_insert(0) += 1;
    }

    let max = counts.values().copied().max()?;
    counts
        .into_iter()
        .filter(|(_, count)| *count == max)
        .map(|(value, _)| value)
        .min_by(|a, b| a.total_cmp(b))
        .cloned()
}
