//! JSON parser: record arrays and column-oriented objects

use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::config::{CleanOptions, FileType};
use crate::error::{CleanError, Result};
use crate::model::{CellValue, Column, Table};

use super::{unique_column_names, Parser};

/// Parser for JSON files
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path, _options: &CleanOptions) -> Result<Table> {
        let file = File::open(path).map_err(|e| CleanError::io(path, e))?;
        let reader = BufReader::new(file);

        let value: Value = serde_json::from_reader(reader)?;
        table_from_value(value)
    }

    fn file_type(&self) -> FileType {
        FileType::Json
    }
}

/// Build a table from a parsed JSON document.
///
/// Accepted shapes:
/// - `[{"a": 1, "b": 2}, ...]` records
/// - `{"a": [1, 2], "b": [3, 4]}` column arrays
/// - `{"a": {"0": 1, "1": 2}, ...}` column maps keyed by row label
/// - `{"a": 1, "b": 2}` a single record
pub(crate) fn table_from_value(value: Value) -> Result<Table> {
    match value {
        Value::Array(items) => Ok(from_records(&items)),
        Value::Object(obj) => {
            if !obj.is_empty() && obj.values().all(Value::is_array) {
                Ok(from_column_arrays(&obj))
            } else if !obj.is_empty() && obj.values().all(Value::is_object) {
                Ok(from_column_maps(&obj))
            } else {
                Ok(from_records(&[Value::Object(obj)]))
            }
        }
        _ => Err(CleanError::MalformedInput(
            "JSON must be an array or object".into(),
        )),
    }
}

fn new_table<'a>(names: impl IntoIterator<Item = &'a String>) -> Table {
    let names = unique_column_names(names.into_iter().cloned());
    Table::new(names.into_iter().map(Column::new).collect())
}

fn from_records(items: &[Value]) -> Table {
    // Collect all unique keys across all objects to build column list
    let mut column_names: IndexSet<String> = IndexSet::new();
    for item in items {
        if let Value::Object(obj) = item {
            for key in obj.keys() {
                column_names.insert(key.clone());
            }
        }
    }

    // A plain list of scalars is a single column named "0"
    if column_names.is_empty() && !items.is_empty() {
        column_names.insert("0".to_string());
    }

    let mut table = new_table(&column_names);

    // Convert each object to a row
    for (line_num, item) in items.iter().enumerate() {
        let cells = match item {
            Value::Object(obj) => column_names
                .iter()
                .map(|key| json_value_to_cell(obj.get(key)))
                .collect(),
            // Non-object item in array: put in first column
            _ => vec![json_value_to_cell(Some(item))],
        };

        table.add_row(cells, line_num + 1);
    }

    table.infer_column_types();
    table
}

fn from_column_arrays(obj: &Map<String, Value>) -> Table {
    let columns: Vec<&Vec<Value>> = obj.values().filter_map(Value::as_array).collect();
    let height = columns.iter().map(|c| c.len()).max().unwrap_or(0);

    let mut table = new_table(obj.keys());
    for row_idx in 0..height {
        let cells = columns
            .iter()
            .map(|col| json_value_to_cell(col.get(row_idx)))
            .collect();
        table.add_row(cells, row_idx + 1);
    }

    table.infer_column_types();
    table
}

fn from_column_maps(obj: &Map<String, Value>) -> Table {
    let columns: Vec<&Map<String, Value>> = obj.values().filter_map(Value::as_object).collect();

    // Row labels in first-seen order across all columns
    let mut labels: IndexSet<&str> = IndexSet::new();
    for col in &columns {
        for label in col.keys() {
            labels.insert(label.as_str());
        }
    }

    let mut table = new_table(obj.keys());
    for (row_idx, label) in labels.iter().enumerate() {
        let cells = columns
            .iter()
            .map(|col| json_value_to_cell(col.get(*label)))
            .collect();
        table.add_row(cells, row_idx + 1);
    }

    table.infer_column_types();
    table
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::from(f)
            } else {
                CellValue::String(Cow::Owned(n.to_string()))
            }
        }
        Some(Value::String(s)) => CellValue::String(Cow::Owned(s.clone())),
        // Nested values are kept as their JSON text
        Some(nested @ (Value::Array(_) | Value::Object(_))) => {
            CellValue::String(Cow::Owned(nested.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;
    use serde_json::json;

    #[test]
    fn test_records() {
        let table = table_from_value(json!([
            {"name": "Alice", "age": 30},
            {"name": "Bob", "city": "Oslo"}
        ]))
        .unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "city"]);
        assert_eq!(table.rows[1].cells[1], CellValue::Null);
        assert_eq!(table.rows[0].cells[2], CellValue::Null);
        assert_eq!(table.columns[1].inferred_type, CellType::Int);
    }

    #[test]
    fn test_column_arrays() {
        let table = table_from_value(json!({"a": [1, 2, 3], "b": ["x", null]})).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[2].cells, vec![CellValue::Int(3), CellValue::Null]);
    }

    #[test]
    fn test_column_maps() {
        let table = table_from_value(json!({
            "a": {"0": 1.5, "1": 2.5},
            "b": {"0": "x", "1": "y"}
        }))
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].cells, vec![CellValue::Float(2.5), CellValue::from("y")]);
    }

    #[test]
    fn test_numeric_strings_stay_text() {
        let table = table_from_value(json!([{"n": "1"}, {"n": "2"}])).unwrap();
        assert_eq!(table.columns[0].inferred_type, CellType::String);
    }

    #[test]
    fn test_empty_array_and_scalars() {
        let table = table_from_value(json!([])).unwrap();
        assert_eq!(table.column_count(), 0);

        let table = table_from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(table.column_names(), vec!["0"]);
        assert_eq!(table.row_count(), 3);

        assert!(matches!(
            table_from_value(json!(42)),
            Err(CleanError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_nested_values_serialized() {
        let table = table_from_value(json!([{"tags": ["a", "b"]}])).unwrap();
        assert_eq!(table.rows[0].cells[0], CellValue::from(r#"["a","b"]"#));
    }
}
