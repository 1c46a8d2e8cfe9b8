//! CSV file parser

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::{CleanOptions, FileType};
use crate::error::{CleanError, Result};
use crate::model::{CellType, CellValue, Column, Table};

use super::{unique_column_names, Parser};

/// Field values read as missing
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Parser for CSV files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, _options: &CleanOptions) -> Result<Table> {
        let file = File::open(path).map_err(|e| CleanError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        // Read headers
        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(CleanError::MalformedInput(format!(
                "No columns to parse from {}",
                path.display()
            )));
        }

        let names = unique_column_names(headers.iter().map(str::to_string));
        let columns: Vec<Column> = names.into_iter().map(Column::new).collect();
        let mut table = Table::new(columns);

        // Keep raw fields: columns that do not settle on one type are stored as text
        let mut raw_rows: Vec<csv::StringRecord> = Vec::new();
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result?;
            if record.len() > table.column_count() {
                return Err(CleanError::MalformedInput(format!(
                    "Expected {} fields in line {}, saw {}",
                    table.column_count(),
                    line_num + 2, // +2 for 1-indexing and header
                    record.len()
                )));
            }

            let cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            table.add_row(cells, line_num + 2);
            raw_rows.push(record);
        }

        table.infer_column_types();
        demote_mixed_columns(&mut table, &raw_rows);

        Ok(table)
    }

    fn file_type(&self) -> FileType {
        FileType::Csv
    }
}

fn is_missing_token(s: &str) -> bool {
    NA_TOKENS.contains(&s.trim())
}

/// Turn every `Mixed` column back into its raw text
fn demote_mixed_columns(table: &mut Table, raw_rows: &[csv::StringRecord]) {
    let mixed: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.inferred_type == CellType::Mixed)
        .map(|(i, _)| i)
        .collect();

    if mixed.is_empty() {
        return;
    }

    for (row, record) in table.rows.iter_mut().zip(raw_rows) {
        for &col_idx in &mixed {
            let cell = match record.get(col_idx) {
                Some(raw) if !is_missing_token(raw) => {
                    CellValue::String(Cow::Owned(raw.to_string()))
                }
                _ => CellValue::Null,
            };
            row.cells[col_idx] = cell;
        }
    }

    table.infer_column_types();
}

/// Parse a string value into a CellValue with type inference
pub fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    // Check for empty/null
    if is_missing_token(trimmed) {
        return CellValue::Null;
    }

    // Try parsing as boolean
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    // Try parsing as integer
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Try parsing as float
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::from(f);
    }

    // Try parsing as date
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // Try parsing as datetime (ISO 8601)
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    // Default to string, untrimmed
    CellValue::String(Cow::Owned(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value("NA"), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("FALSE"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value(" 42 "), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14"), CellValue::Float(3.14));
        assert_eq!(
            parse_cell_value("2024-01-31"),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert_eq!(
            parse_cell_value("hello"),
            CellValue::String(Cow::Owned("hello".to_string()))
        );
    }

    #[test]
    fn test_parse_infers_columns() {
        let file = write_csv("name,age,score\nAlice,30,1.5\nBob,,2\n");
        let table = CsvParser.parse(file.path(), &CleanOptions::default()).unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "score"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[0].inferred_type, CellType::String);
        assert_eq!(table.columns[1].inferred_type, CellType::Int);
        assert_eq!(table.columns[2].inferred_type, CellType::Float);
        assert_eq!(table.rows[1].cells[1], CellValue::Null);
        assert_eq!(table.rows[1].source_line, 3);
    }

    #[test]
    fn test_mixed_column_kept_as_text() {
        let file = write_csv("code\n1\nabc\nNA\n2\n");
        let table = CsvParser.parse(file.path(), &CleanOptions::default()).unwrap();

        assert_eq!(table.columns[0].inferred_type, CellType::String);
        let values: Vec<_> = table.column_values(0).cloned().collect();
        assert_eq!(
            values,
            vec![
                CellValue::from("1"),
                CellValue::from("abc"),
                CellValue::Null,
                CellValue::from("2")
            ]
        );
    }

    #[test]
    fn test_short_rows_padded_and_long_rows_rejected() {
        let file = write_csv("a,b\n1\n");
        let table = CsvParser.parse(file.path(), &CleanOptions::default()).unwrap();
        assert_eq!(table.rows[0].cells, vec![CellValue::Int(1), CellValue::Null]);

        let file = write_csv("a,b\n1,2,3\n");
        let err = CsvParser.parse(file.path(), &CleanOptions::default()).unwrap_err();
        assert!(matches!(err, CleanError::MalformedInput(_)));
    }

    #[test]
    fn test_duplicate_headers_are_mangled() {
        let file = write_csv("a,a,\n1,2,3\n");
        let table = CsvParser.parse(file.path(), &CleanOptions::default()).unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CsvParser
            .parse(Path::new("/definitely/not/here.csv"), &CleanOptions::default())
            .unwrap_err();
        assert!(matches!(err, CleanError::Io { .. }));
    }
}
