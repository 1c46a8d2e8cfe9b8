//! Parser layer for reading various tabular data formats

mod csv;
mod excel;
mod json;

use std::path::Path;

use tracing::debug;

use crate::config::{CleanOptions, FileType};
use crate::error::Result;
use crate::model::Table;

pub use self::csv::{parse_cell_value, CsvParser};
pub use self::excel::ExcelParser;
pub use self::json::JsonParser;

/// Trait for parsing tabular data files
pub trait Parser: Send + Sync {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, options: &CleanOptions) -> Result<Table>;

    /// The file type this parser reads
    fn file_type(&self) -> FileType;
}

/// Factory for creating parsers based on file type
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(CsvParser),
                Box::new(ExcelParser),
                Box::new(JsonParser),
            ],
        }
    }

    /// Get the parser for the given file type
    pub fn get_parser(&self, file_type: FileType) -> &dyn Parser {
        self.parsers
            .iter()
            .find(|p| p.file_type() == file_type)
            .map(|p| p.as_ref())
            .unwrap_or(&CsvParser)
    }

    /// Parse a file using the parser selected by `options.file_type`
    pub fn parse(&self, path: &Path, options: &CleanOptions) -> Result<Table> {
        let parser = self.get_parser(options.file_type);
        let table = parser.parse(path, options)?;
        debug!(
            "Loaded {} ({}): {} rows x {} columns",
            path.display(),
            options.file_type,
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }
}

/// Read a file of the given type into a table
pub fn load_data(path: impl AsRef<Path>, options: &CleanOptions) -> Result<Table> {
    ParserFactory::new().parse(path.as_ref(), options)
}

/// Make header names unique: blanks become `Unnamed: {i}`, repeats get `.1`, `.2`, ...
pub(crate) fn unique_column_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let raw: Vec<String> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect();

    let mut taken: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 1;
        while taken.contains(&candidate) {
            candidate = format!("{}.{}", name, n);
            n += 1;
        }
        taken.push(candidate);
    }
    taken
}

/// Detect file format from content (for files without a usable extension)
pub fn detect_format(path: &Path) -> Option<FileType> {
    use std::fs::File;
    use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8];
    let bytes_read = reader.read(&mut buffer).ok()?;

    if bytes_read >= 4 {
        // Excel ZIP format (xlsx) or OLE compound file (xls)
        if &buffer[0..4] == b"PK\x03\x04" || &buffer[0..4] == b"\xD0\xCF\x11\xE0" {
            return Some(FileType::Excel);
        }
    }

    reader.seek(SeekFrom::Start(0)).ok()?;
    let mut line = String::new();
    while reader.read_line(&mut line).ok()? > 0 {
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if !trimmed.is_empty() {
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                return Some(FileType::Json);
            }
            break;
        }
        line.clear();
    }

    Some(FileType::Csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unique_column_names() {
        let names = unique_column_names(
            ["a", "", "a", "b", "a", "a.1"]
                .iter()
                .map(|s| s.to_string()),
        );
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "b", "a.2", "a.1.1"]);
    }

    #[test]
    fn test_detect_format() {
        let mut json = tempfile::NamedTempFile::new().unwrap();
        writeln!(json, "\n  [{{\"a\": 1}}]").unwrap();
        assert_eq!(detect_format(json.path()), Some(FileType::Json));

        let mut csv = tempfile::NamedTempFile::new().unwrap();
        writeln!(csv, "a,b\n1,2").unwrap();
        assert_eq!(detect_format(csv.path()), Some(FileType::Csv));

        let mut xlsx = tempfile::NamedTempFile::new().unwrap();
        xlsx.write_all(b"PK\x03\x04rest-of-zip").unwrap();
        assert_eq!(detect_format(xlsx.path()), Some(FileType::Excel));
    }

    #[test]
    fn test_factory_selects_by_type() {
        let factory = ParserFactory::new();
        assert_eq!(factory.get_parser(FileType::Json).file_type(), FileType::Json);
        assert_eq!(factory.get_parser(FileType::Excel).file_type(), FileType::Excel);
    }
}
