//! Per-column numeric coercion.
//!
//! Each column either converts as a whole or stays exactly as it was; the
//! outcome is reported per column instead of being raised.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::model::{CellType, CellValue, Table};

/// Outcome of trying to make one column numeric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Coercion {
    /// Every value was numeric-looking and the column now holds numbers
    Converted { to: CellType },
    /// Column was numeric before the step
    AlreadyNumeric,
    /// Column kept its prior form
    Unchanged { reason: String },
}

impl Coercion {
    pub fn is_converted(&self) -> bool {
        matches!(self, Coercion::Converted { .. })
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Converted { to } => write!(f, "converted to {}", to),
            Coercion::AlreadyNumeric => write!(f, "already numeric"),
            Coercion::Unchanged { reason } => write!(f, "unchanged ({})", reason),
        }
    }
}

/// Coercion outcome for a named column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCoercion {
    pub column: String,
    #[serde(flatten)]
    pub outcome: Coercion,
}

/// Try to reinterpret every column as numeric. Never fails.
pub fn adjust_types(table: &mut Table) -> Vec<ColumnCoercion> {
    let mut outcomes = Vec::with_capacity(table.column_count());

    for col_idx in 0..table.column_count() {
        let outcome = match coerce_column(table, col_idx) {
            Ok(Some(cells)) => {
                for (row, cell) in table.rows.iter_mut().zip(cells) {
                    row.cells[col_idx] = cell;
                }
                table.infer_column_types();
                Coercion::Converted {
                    to: table.columns[col_idx].inferred_type,
                }
            }
            Ok(None) => Coercion::AlreadyNumeric,
            Err(reason) => Coercion::Unchanged { reason },
        };

        let column = table.columns[col_idx].name.clone();
        debug!("Column '{}': {}", column, outcome);
        outcomes.push(ColumnCoercion { column, outcome });
    }

    outcomes
}

/// Converted cells for a column, `Ok(None)` when it is already numeric
fn coerce_column(
    table: &Table,
    col_idx: usize,
) -> Result<Option<Vec<CellValue>>, String> {
    let current = table.columns[col_idx].inferred_type;
    if current.is_numeric() {
        return Ok(None);
    }
    if current == CellType::Null {
        return Err("no values".to_string());
    }

    let cells = table
        .column_values(col_idx)
        .map(to_number)
        .collect::<Result<Vec<_>, _>>()?;

    // Mixed integers and floats become floats throughout
    let all_int = cells
        .iter()
        .all(|c| matches!(c, CellValue::Int(_) | CellValue::Null));
    if all_int {
        return Ok(Some(cells));
    }

    Ok(Some(
        cells
            .into_iter()
            .map(|c| match c {
                CellValue::Int(i) => CellValue::Float(i as f64),
                other => other,
            })
            .collect(),
    ))
}

fn to_number(cell: &CellValue) -> Result<CellValue, String> {
    match cell {
        CellValue::Null | CellValue::Int(_) | CellValue::Float(_) => Ok(cell.clone()),
        CellValue::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Ok(CellValue::Int(i))
            } else if let Ok(f) = trimmed.parse::<f64>() {
                Ok(CellValue::from(f))
            } else {
                Err(format!("'{}' is not numeric", s))
            }
        }
        CellValue::Bool(_) => Err("boolean values".to_string()),
        CellValue::Date(_) | CellValue::DateTime(_) => Err("date values".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_converts() {
        let mut table = Table::from_rows(
            vec!["n", "f"],
            vec![
                vec![CellValue::from("1"), CellValue::from("1.5")],
                vec![CellValue::from(" 2 "), CellValue::from("2")],
                vec![CellValue::Null, CellValue::from("nan")],
            ],
        );

        let outcomes = adjust_types(&mut table);

        assert_eq!(outcomes[0].outcome, Coercion::Converted { to: CellType::Int });
        assert_eq!(outcomes[1].outcome, Coercion::Converted { to: CellType::Float });
        assert_eq!(table.rows[1].cells, vec![CellValue::Int(2), CellValue::Float(2.0)]);
        assert_eq!(table.rows[2].cells, vec![CellValue::Null, CellValue::Null]);
    }

    #[test]
    fn test_non_numeric_column_left_unchanged() {
        let original = Table::from_rows(
            vec!["code", "flag", "age"],
            vec![
                vec![CellValue::from("1"), CellValue::Bool(true), CellValue::Int(3)],
                vec![CellValue::from("abc"), CellValue::Bool(false), CellValue::Int(4)],
            ],
        );
        let mut table = original.clone();

        let outcomes = adjust_types(&mut table);

        assert!(matches!(outcomes[0].outcome, Coercion::Unchanged { .. }));
        assert!(matches!(outcomes[1].outcome, Coercion::Unchanged { .. }));
        assert_eq!(outcomes[2].outcome, Coercion::AlreadyNumeric);
        assert_eq!(table, original);
    }

    #[test]
    fn test_shape_is_preserved() {
        let mut table = Table::from_rows(
            vec!["a", "b", "c"],
            vec![
                vec![CellValue::from("x"), CellValue::Null, CellValue::from("3")],
                vec![CellValue::Int(1), CellValue::Null, CellValue::Float(2.5)],
            ],
        );
        let (rows, cols) = (table.row_count(), table.column_count());

        let outcomes = adjust_types(&mut table);

        assert_eq!(outcomes.len(), cols);
        assert_eq!(table.row_count(), rows);
        assert_eq!(table.column_count(), cols);
        assert!(outcomes[2].outcome.is_converted());
        assert_eq!(table.columns[2].inferred_type, CellType::Float);
    }
}
