//! Configuration handling for dataclean

use std::path::Path;

use crate::error::CleanError;
use crate::model::CellValue;

/// Input file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileType {
    #[default]
    Csv,
    Excel,
    Json,
}

impl FileType {
    /// Guess the file type from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileType::Csv),
            "xlsx" | "xls" | "xlsm" | "ods" => Some(FileType::Excel),
            "json" => Some(FileType::Json),
            _ => None,
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(FileType::Csv),
            "excel" => Ok(FileType::Excel),
            "json" => Ok(FileType::Json),
            _ => Err(CleanError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Csv => write!(f, "csv"),
            FileType::Excel => write!(f, "excel"),
            FileType::Json => write!(f, "json"),
        }
    }
}

/// How missing cells are repaired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingStrategy {
    /// Column mean, numeric columns only
    #[default]
    Mean,
    /// Column median, numeric columns only
    Median,
    /// Most frequent value, every column
    Mode,
    /// A caller-supplied constant
    Fill,
    /// Drop rows holding any missing cell
    Drop,
}

impl std::str::FromStr for MissingStrategy {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(MissingStrategy::Mean),
            "median" => Ok(MissingStrategy::Median),
            "mode" => Ok(MissingStrategy::Mode),
            "fill" => Ok(MissingStrategy::Fill),
            "drop" => Ok(MissingStrategy::Drop),
            _ => Err(CleanError::InvalidStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingStrategy::Mean => write!(f, "mean"),
            MissingStrategy::Median => write!(f, "median"),
            MissingStrategy::Mode => write!(f, "mode"),
            MissingStrategy::Fill => write!(f, "fill"),
            MissingStrategy::Drop => write!(f, "drop"),
        }
    }
}

/// Output format for the cleaned table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Csv,
    Json,
}

/// Options for one run of the cleaning pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOptions {
    /// Format of the input file
    pub file_type: FileType,
    /// Missing value strategy
    pub missing_strategy: MissingStrategy,
    /// Remove exact duplicate rows
    pub drop_duplicates: bool,
    /// Value used by the `fill` strategy
    pub fill_value: Option<CellValue>,
    /// For Excel files: which sheet to load
    pub sheet_name: Option<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            file_type: FileType::default(),
            missing_strategy: MissingStrategy::default(),
            drop_duplicates: true,
            fill_value: None,
            sheet_name: None,
        }
    }
}

impl CleanOptions {
    /// Set the input file type
    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Set the missing value strategy
    pub fn with_missing_strategy(mut self, strategy: MissingStrategy) -> Self {
        self.missing_strategy = strategy;
        self
    }

    /// Toggle duplicate removal
    pub fn with_drop_duplicates(mut self, drop: bool) -> Self {
        self.drop_duplicates = drop;
        self
    }

    /// Set the value used by the `fill` strategy
    pub fn with_fill_value(mut self, value: impl Into<CellValue>) -> Self {
        self.fill_value = Some(value.into());
        self
    }

    /// Set Excel sheet name
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_tags() {
        assert_eq!("csv".parse::<FileType>().unwrap(), FileType::Csv);
        assert_eq!("Excel".parse::<FileType>().unwrap(), FileType::Excel);
        assert_eq!("json".parse::<FileType>().unwrap(), FileType::Json);
        assert!(matches!(
            "parquet".parse::<FileType>(),
            Err(CleanError::UnsupportedFormat(tag)) if tag == "parquet"
        ));
    }

    #[test]
    fn test_missing_strategy_tags() {
        assert_eq!("median".parse::<MissingStrategy>().unwrap(), MissingStrategy::Median);
        assert_eq!("drop".parse::<MissingStrategy>().unwrap(), MissingStrategy::Drop);
        assert!(matches!(
            "interpolate".parse::<MissingStrategy>(),
            Err(CleanError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(FileType::from_path(Path::new("a/b.CSV")), Some(FileType::Csv));
        assert_eq!(FileType::from_path(Path::new("book.xlsx")), Some(FileType::Excel));
        assert_eq!(FileType::from_path(Path::new("data.json")), Some(FileType::Json));
        assert_eq!(FileType::from_path(Path::new("data")), None);
    }

    #[test]
    fn test_defaults() {
        let options = CleanOptions::default();
        assert_eq!(options.file_type, FileType::Csv);
        assert_eq!(options.missing_strategy, MissingStrategy::Mean);
        assert!(options.drop_duplicates);
        assert!(options.fill_value.is_none());
    }
}
