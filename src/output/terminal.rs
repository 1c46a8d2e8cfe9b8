//! Terminal summary with a table preview

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::clean::{CleanOutcome, CleanStats, ColumnCoercion};
use crate::model::Table;

use super::OutputFormatter;

const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Human-readable report of a cleaning run
pub struct TerminalOutput {
    preview_rows: usize,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    pub fn with_preview_rows(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    fn write_header(&self, writer: &mut dyn Write, source: &Path) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " dataclean: {}", source.display())?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_summary(&self, stats: &CleanStats, writer: &mut dyn Write) -> Result<()> {
        writeln!(
            writer,
            "Summary: {} → {} rows, {} columns",
            stats.rows_loaded, stats.final_row_count, stats.final_column_count
        )?;
        writeln!(writer, "  Missing cells filled:   {}", stats.cells_filled)?;
        writeln!(writer, "  Rows with missing:      -{}", stats.rows_dropped_missing)?;
        writeln!(writer, "  Duplicate rows:         -{}", stats.duplicates_removed)?;
        writeln!(writer, "  Outlier rows:           -{}", stats.outliers_removed)?;
        writeln!(writer, "  Columns made numeric:   {}", stats.columns_converted)?;
        writeln!(writer, "  Column names rewritten: {}", stats.columns_renamed)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_coercions(&self, coercions: &[ColumnCoercion], writer: &mut dyn Write) -> Result<()> {
        if coercions.is_empty() {
            return Ok(());
        }

        writeln!(writer, "Column Types:")?;
        for c in coercions {
            writeln!(writer, "  {}: {}", c.column, c.outcome)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_preview(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        if table.column_count() == 0 {
            writeln!(writer, "(empty table)")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(
            table
                .columns
                .iter()
                .map(|c| format!("{} ({})", c.name, c.inferred_type)),
        );
        for row in table.rows.iter().take(self.preview_rows) {
            builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
        }

        let mut rendered = builder.build();
        rendered.with(Style::modern());
        writeln!(writer, "{}", rendered)?;

        if table.row_count() > self.preview_rows {
            writeln!(
                writer,
                "… {} more rows",
                table.row_count() - self.preview_rows
            )?;
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, outcome: &CleanOutcome, source: &Path, writer: &mut dyn Write) -> Result<()> {
        self.write_header(writer, source)?;
        self.write_summary(&outcome.stats, writer)?;
        self.write_coercions(&outcome.coercions, writer)?;
        self.write_preview(&outcome.table, writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{Coercion, CleanOutcome};
    use crate::model::CellValue;

    #[test]
    fn test_render_preview_is_truncated() {
        let rows = (0..5).map(|i| vec![CellValue::Int(i)]).collect();
        let outcome = CleanOutcome {
            table: Table::from_rows(vec!["n"], rows),
            stats: CleanStats {
                rows_loaded: 6,
                duplicates_removed: 1,
                final_row_count: 5,
                final_column_count: 1,
                ..Default::default()
            },
            coercions: vec![ColumnCoercion {
                column: "n".into(),
                outcome: Coercion::AlreadyNumeric,
            }],
        };

        let mut buf = Vec::new();
        TerminalOutput::with_preview_rows(2)
            .render(&outcome, Path::new("data.csv"), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("dataclean: data.csv"));
        assert!(text.contains("Summary: 6 → 5 rows, 1 columns"));
        assert!(text.contains("n: already numeric"));
        assert!(text.contains("n (int)"));
        assert!(text.contains("… 3 more rows"));
    }
}
