//! Output formatting for cleaned tables

mod csv;
mod json;
mod terminal;

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::clean::CleanOutcome;
use crate::config::OutputFormat;

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a cleaning outcome to a writer
    fn render(&self, outcome: &CleanOutcome, source: &Path, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Csv => Box::new(CsvOutput),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a cleaning outcome to stdout
pub fn render_to_stdout(outcome: &CleanOutcome, source: &Path, format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout().lock();
    formatter.render(outcome, source, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
