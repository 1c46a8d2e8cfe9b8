//! Column name normalization

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::model::Table;

/// Canonical form of a column label: trimmed, lowercased, spaces as underscores
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Normalize every column name in place, returning how many names changed.
///
/// Names that collide after normalization keep the first column as-is and
/// suffix later ones with `_1`, `_2`, ... so names stay unique.
pub fn normalize_column_names(table: &mut Table) -> usize {
    let normalized: Vec<String> = table
        .columns
        .iter()
        .map(|c| normalize_name(&c.name))
        .collect();
    let all_bases: FxHashSet<&str> = normalized.iter().map(String::as_str).collect();

    let mut taken: FxHashSet<String> = FxHashSet::default();
    let mut final_names = Vec::with_capacity(normalized.len());
    for base in &normalized {
        let mut candidate = base.clone();
        let mut n = 1;
        while taken.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
            // Do not steal a name another column normalizes to
            while all_bases.contains(candidate.as_str()) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
        }
        if &candidate != base {
            warn!("Column name '{}' collides after normalization, using '{}'", base, candidate);
        }
        taken.insert(candidate.clone());
        final_names.push(candidate);
    }

    let mut renamed = 0;
    for (col, name) in table.columns.iter_mut().zip(final_names) {
        if col.name != name {
            col.name = name;
            renamed += 1;
        }
    }

    debug!("Normalized {} column names", renamed);
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn table_with(names: &[&str]) -> Table {
        Table::from_rows(
            names.to_vec(),
            vec![vec![CellValue::Int(1); names.len()]],
        )
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(" Name "), "name");
        assert_eq!(normalize_name("Age "), "age");
        assert_eq!(normalize_name("First Name"), "first_name");
        assert_eq!(normalize_name("  Total  Sales "), "total__sales");
        assert_eq!(normalize_name("ÉTÉ Ville"), "été_ville");
    }

    #[test]
    fn test_normalize_columns() {
        let mut table = table_with(&[" Name ", "age", "Zip Code"]);
        assert_eq!(normalize_column_names(&mut table), 2);
        assert_eq!(table.column_names(), vec!["name", "age", "zip_code"]);
    }

    #[test]
    fn test_idempotent() {
        let mut table = table_with(&[" Name ", "AGE", "a b"]);
        normalize_column_names(&mut table);
        let once = table.clone();

        assert_eq!(normalize_column_names(&mut table), 0);
        assert_eq!(table, once);
    }

    #[test]
    fn test_collisions_are_suffixed() {
        let mut table = table_with(&["Name", "name ", "NAME", "name_1"]);
        normalize_column_names(&mut table);
        assert_eq!(table.column_names(), vec!["name", "name_2", "name_3", "name_1"]);

        // Still unique and stable on a second pass
        assert_eq!(normalize_column_names(&mut table), 0);
    }
}
