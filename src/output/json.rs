//! JSON output format

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::clean::{CleanOutcome, CleanStats, ColumnCoercion};
use crate::model::CellValue;

use super::OutputFormatter;

/// JSON output formatter: an array of records keyed by column name
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Run report for `--stats-only` JSON output
#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    stats: &'a CleanStats,
    rows_removed: usize,
    coercions: &'a [ColumnCoercion],
}

fn cell_value_to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        // Non-finite floats have no JSON form
        CellValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CellValue::String(s) => Value::String(s.to_string()),
        CellValue::Date(d) => Value::String(d.to_string()),
        CellValue::DateTime(dt) => Value::String(dt.to_string()),
    }
}

impl JsonOutput {
    /// Write the run statistics and per-column coercion outcomes, without the table
    pub fn render_report(&self, outcome: &CleanOutcome, source: &Path, writer: &mut dyn Write) -> Result<()> {
        let report = JsonReport {
            file: source.display().to_string(),
            stats: &outcome.stats,
            rows_removed: outcome.stats.rows_removed(),
            coercions: &outcome.coercions,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &report)?;
        } else {
            serde_json::to_writer(&mut *writer, &report)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, outcome: &CleanOutcome, _source: &Path, writer: &mut dyn Write) -> Result<()> {
        let table = &outcome.table;
        let records: Vec<Value> = table
            .rows
            .iter()
            .map(|row| {
                let record: Map<String, Value> = table
                    .columns
                    .iter()
                    .zip(&row.cells)
                    .map(|(col, cell)| (col.name.clone(), cell_value_to_json(cell)))
                    .collect();
                Value::Object(record)
            })
            .collect();

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &records)?;
        } else {
            serde_json::to_writer(&mut *writer, &records)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
