//! Exact duplicate row removal

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::model::Table;

/// Remove rows equal to an earlier row, keeping first occurrences in order.
///
/// Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let before = table.row_count();

    let keep: Vec<bool> = {
        let mut seen = FxHashSet::default();
        table
            .rows
            .iter()
            .map(|row| seen.insert(row.cells.as_slice()))
            .collect()
    };

    let mut keep = keep.into_iter();
    table.rows.retain(|_| keep.next().unwrap_or(true));

    let removed = before - table.row_count();
    debug!("Removed {} duplicate rows", removed);
    removed
}
