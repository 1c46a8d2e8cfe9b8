//! Cleaning pipeline: the individual steps and the engine that runs them in order.

pub mod coerce;
pub mod dedup;
pub mod missing;
pub mod names;
pub mod outliers;
mod stats;

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::CleanOptions;
use crate::error::Result;
use crate::model::Table;
use crate::parser::ParserFactory;

pub use coerce::{adjust_types, Coercion, ColumnCoercion};
pub use dedup::remove_duplicates;
pub use missing::{handle_missing_values, MissingReport};
pub use names::{normalize_column_names, normalize_name};
pub use outliers::{filter_outliers, DEFAULT_Z_THRESHOLD};

/// Statistics about one pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub rows_loaded: usize,
    pub rows_dropped_missing: usize,
    pub cells_filled: usize,
    pub duplicates_removed: usize,
    pub columns_converted: usize,
    pub columns_renamed: usize,
    pub outliers_removed: usize,
    pub final_row_count: usize,
    pub final_column_count: usize,
}

impl CleanStats {
    /// Total rows removed by every step
    pub fn rows_removed(&self) -> usize {
        self.rows_dropped_missing + self.duplicates_removed + self.outliers_removed
    }
}

/// Result of a pipeline run
#[derive(Debug)]
pub struct CleanOutcome {
    /// The cleaned table
    pub table: Table,
    /// What each step changed
    pub stats: CleanStats,
    /// Per-column result of numeric coercion, named as loaded
    pub coercions: Vec<ColumnCoercion>,
}

/// Pipeline engine
pub struct Cleaner {
    options: CleanOptions,
    parsers: ParserFactory,
}

impl Cleaner {
    /// Create a new engine with options
    pub fn new(options: CleanOptions) -> Self {
        Self {
            options,
            parsers: ParserFactory::new(),
        }
    }

    /// Load `path` and run every step over it
    pub fn run(&self, path: &Path) -> Result<CleanOutcome> {
        info!(
            "Cleaning {} (type={}, missing={}, dedup={})",
            path.display(),
            self.options.file_type,
            self.options.missing_strategy,
            self.options.drop_duplicates
        );

        let table = self.parsers.parse(path, &self.options)?;
        let outcome = self.clean(table)?;

        info!(
            "Cleaned {}: {} -> {} rows, {} columns",
            path.display(),
            outcome.stats.rows_loaded,
            outcome.stats.final_row_count,
            outcome.stats.final_column_count
        );
        Ok(outcome)
    }

    /// Run every step after loading over an in-memory table
    pub fn clean(&self, mut table: Table) -> Result<CleanOutcome> {
        let mut stats = CleanStats {
            rows_loaded: table.row_count(),
            ..Default::default()
        };

        let missing = handle_missing_values(
            &mut table,
            self.options.missing_strategy,
            self.options.fill_value.as_ref(),
        )?;
        stats.cells_filled = missing.cells_filled;
        stats.rows_dropped_missing = missing.rows_dropped;

        if self.options.drop_duplicates {
            stats.duplicates_removed = remove_duplicates(&mut table);
        }

        // Coercion sees the names as loaded; normalization comes after
        let coercions = adjust_types(&mut table);
        stats.columns_converted = coercions.iter().filter(|c| c.outcome.is_converted()).count();

        stats.columns_renamed = normalize_column_names(&mut table);

        stats.outliers_removed = filter_outliers(&mut table, DEFAULT_Z_THRESHOLD);

        stats.final_row_count = table.row_count();
        stats.final_column_count = table.column_count();

        Ok(CleanOutcome {
            table,
            stats,
            coercions,
        })
    }
}

/// Load and clean a file, returning the cleaned table
pub fn clean_data(path: impl AsRef<Path>, options: &CleanOptions) -> Result<Table> {
    let cleaner = Cleaner::new(options.clone());
    Ok(cleaner.run(path.as_ref())?.table)
}
