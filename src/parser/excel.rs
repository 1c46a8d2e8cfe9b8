//! Excel file parser (xlsx, xls, ods)

use std::borrow::Cow;
use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::{CleanOptions, FileType};
use crate::error::{CleanError, Result};
use crate::model::{CellValue, Column, Table};

use super::{unique_column_names, Parser};

/// Parser for Excel files
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, path: &Path, options: &CleanOptions) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)?;

        // Get sheet name
        let sheet_name = match options.sheet_name {
            Some(ref name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| CleanError::MalformedInput("No sheets found in workbook".into()))?,
        };

        let range: Range<Data> = workbook.worksheet_range(&sheet_name)?;

        Ok(parse_range(&range))
    }

    fn file_type(&self) -> FileType {
        FileType::Excel
    }
}

/// Turn a sheet range into a table, reading the first row as the header
pub(crate) fn parse_range(range: &Range<Data>) -> Table {
    let (_, col_count) = range.get_size();

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Table::new(Vec::new());
    };

    let names = unique_column_names(header_row.iter().map(cell_to_string));
    let mut table = Table::new(names.into_iter().map(Column::new).collect());

    for (line_num, row) in rows.enumerate() {
        let cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
        table.add_row(cells, line_num + 2); // +2 for 1-indexing and header
    }

    table.infer_column_types();
    table
}

/// Header text for a cell; dates print the way their cells load
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => convert_datetime(dt).display().into_owned(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(Cow::Owned(s.clone())),
        // Sheets store every number as a float
        Data::Float(f) if f.fract() == 0.0 && f.abs() < I64_LIMIT => CellValue::Int(*f as i64),
        Data::Float(f) => CellValue::from(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => convert_datetime(dt),
        Data::DateTimeIso(s) => parse_iso_datetime(s),
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        // #N/A, #DIV/0! and friends read as missing
        Data::Error(_) => CellValue::Null,
    }
}

/// 2^63, the first float past `i64::MAX`
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Decode a date-formatted serial number.
///
/// Midnight values load as dates. Durations (`[h]:mm:ss` formats) load as
/// `H:MM:SS` text so they are never mistaken for numbers. A serial outside
/// chrono's range reads as missing.
fn convert_datetime(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return dt
            .as_duration()
            .map_or(CellValue::Null, |d| CellValue::String(Cow::Owned(format_duration(d))));
    }

    match dt.as_datetime() {
        Some(datetime) if datetime.time() == NaiveTime::MIN => CellValue::Date(datetime.date()),
        Some(datetime) => CellValue::DateTime(datetime),
        None => CellValue::Null,
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    format!("{}{}:{:02}:{:02}", sign, secs / 3600, secs / 60 % 60, secs % 60)
}

/// ODS stores dates as ISO text
fn parse_iso_datetime(s: &str) -> CellValue {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        CellValue::DateTime(datetime)
    } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        CellValue::Date(date)
    } else {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}
