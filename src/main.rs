//! dataclean - Cleaning pipeline for tabular data

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use dataclean::clean::Cleaner;
use dataclean::config::{CleanOptions, FileType, MissingStrategy, OutputFormat};
use dataclean::output::{render_to_stdout, JsonOutput, OutputFactory};
use dataclean::parser::{detect_format, parse_cell_value};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFileType {
    Csv,
    Excel,
    Json,
}

impl From<CliFileType> for FileType {
    fn from(f: CliFileType) -> Self {
        match f {
            CliFileType::Csv => FileType::Csv,
            CliFileType::Excel => FileType::Excel,
            CliFileType::Json => FileType::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Column mean (numeric columns)
    Mean,
    /// Column median (numeric columns)
    Median,
    /// Most frequent value (all columns)
    Mode,
    /// The value given by --fill-value
    Fill,
    /// Drop rows with any missing cell
    Drop,
}

impl From<CliMissingStrategy> for MissingStrategy {
    fn from(s: CliMissingStrategy) -> Self {
        match s {
            CliMissingStrategy::Mean => MissingStrategy::Mean,
            CliMissingStrategy::Median => MissingStrategy::Median,
            CliMissingStrategy::Mode => MissingStrategy::Mode,
            CliMissingStrategy::Fill => MissingStrategy::Fill,
            CliMissingStrategy::Drop => MissingStrategy::Drop,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Csv,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Clean tabular data (CSV, Excel, JSON)
#[derive(Parser, Debug)]
#[command(name = "dataclean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to clean
    file: PathBuf,

    /// Input format (guessed from the extension or content when omitted)
    #[arg(short = 't', long = "type", value_enum)]
    file_type: Option<CliFileType>,

    /// How to repair missing values
    #[arg(short, long, value_enum, default_value = "mean")]
    missing: CliMissingStrategy,

    /// Value used by `--missing fill`
    #[arg(long)]
    fill_value: Option<String>,

    /// Keep duplicate rows
    #[arg(long)]
    keep_duplicates: bool,

    /// For Excel files: which sheet to load
    #[arg(long)]
    sheet: Option<String>,

    /// Write the cleaned table here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Only show statistics, not the table
    #[arg(long)]
    stats_only: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let file_type = match cli.file_type {
        Some(t) => t.into(),
        None => FileType::from_path(&cli.file)
            .or_else(|| detect_format(&cli.file))
            .unwrap_or_default(),
    };

    let mut options = CleanOptions::default()
        .with_file_type(file_type)
        .with_missing_strategy(cli.missing.into())
        .with_drop_duplicates(!cli.keep_duplicates);
    if let Some(ref raw) = cli.fill_value {
        options = options.with_fill_value(parse_cell_value(raw));
    }
    if let Some(sheet) = cli.sheet {
        options = options.with_sheet_name(sheet);
    }

    let outcome = Cleaner::new(options)
        .run(&cli.file)
        .with_context(|| format!("Failed to clean {}", cli.file.display()))?;

    let format: OutputFormat = cli.format.into();

    if cli.stats_only && format == OutputFormat::Json {
        let mut stdout = std::io::stdout().lock();
        JsonOutput::new().render_report(&outcome, &cli.file, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    if cli.stats_only {
        let stats = &outcome.stats;
        println!("File: {} ({} rows loaded)", cli.file.display(), stats.rows_loaded);
        println!();
        println!("Cells filled:       {}", stats.cells_filled);
        println!("Dropped (missing):  {}", stats.rows_dropped_missing);
        println!("Duplicates removed: {}", stats.duplicates_removed);
        println!("Outliers removed:   {}", stats.outliers_removed);
        println!("Columns converted:  {}", stats.columns_converted);
        println!("Columns renamed:    {}", stats.columns_renamed);
        println!("Final shape:        {} x {}", stats.final_row_count, stats.final_column_count);
        return Ok(());
    }

    match cli.output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            OutputFactory::create(format).render(&outcome, &cli.file, &mut writer)?;
            writer.flush()?;
        }
        None => render_to_stdout(&outcome, &cli.file, format)?,
    }

    Ok(())
}
