//! dataclean - Cleaning pipeline for tabular data
//!
//! Loads a CSV, Excel or JSON file into a [`Table`], repairs missing values,
//! drops duplicate rows, coerces numeric-looking columns, normalizes column
//! names and filters z-score outliers.
//!
//! ```no_run
//! use dataclean::{clean_data, CleanOptions, MissingStrategy};
//!
//! # fn example() -> dataclean::Result<()> {
//! let options = CleanOptions::default().with_missing_strategy(MissingStrategy::Median);
//! let table = clean_data("data.csv", &options)?;
//! println!("{} rows left", table.row_count());
//! # Ok(())
//! # }
//! ```

pub mod clean;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use clean::{clean_data, CleanOutcome, CleanStats, Cleaner};
pub use config::{CleanOptions, FileType, MissingStrategy, OutputFormat};
pub use error::{CleanError, Result};
pub use model::{CellValue, Table};
