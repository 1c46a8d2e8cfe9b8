//! CSV output format

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::clean::CleanOutcome;

use super::OutputFormatter;

/// Writes the cleaned table as CSV with a header row; missing cells are empty fields
pub struct CsvOutput;

impl OutputFormatter for CsvOutput {
    fn render(&self, outcome: &CleanOutcome, _source: &Path, writer: &mut dyn Write) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(outcome.table.columns.iter().map(|c| c.name.as_str()))?;
        for row in &outcome.table.rows {
            csv_writer.write_record(row.cells.iter().map(|c| c.display().into_owned()))?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
