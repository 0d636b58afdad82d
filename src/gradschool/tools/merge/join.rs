use std::collections::HashMap;

use crate::gradschool::tools::error::{Result, ToolError};
use crate::gradschool::tools::model::SheetTable;

/// Left-joins `right` onto `left` on the `key` column.
///
/// Every left row is emitted once per matching right row, in right-sheet
/// order, or once with empty right cells when nothing matches. A right column
/// whose name is already taken keeps its values under
/// `<column>_<right sheet name>`; the left column keeps the bare name.
pub fn left_join(left: SheetTable, right: &SheetTable, key: &str) -> Result<SheetTable> {
    let left_key = left.column_index(key).ok_or_else(|| missing_key(&left, key))?;
    let right_key = right
        .column_index(key)
        .ok_or_else(|| missing_key(right, key))?;

    let right_columns: Vec<usize> = (0..right.columns.len())
        .filter(|index| *index != right_key)
        .collect();

    let mut columns = left.columns;
    let left_width = columns.len();
    for index in &right_columns {
        let name = resolve_column_name(&columns, &right.columns[*index], &right.sheet_name);
        columns.push(name);
    }

    let mut matches: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row_index, row) in right.rows.iter().enumerate() {
        matches
            .entry(cell(row, right_key))
            .or_default()
            .push(row_index);
    }

    let mut rows = Vec::with_capacity(left.rows.len());
    for mut row in left.rows {
        // Short rows read as empty cells.
        row.resize(left_width, String::new());
        match matches.get(cell(&row, left_key)) {
            Some(hits) => {
                for hit in hits {
                    let right_row = &right.rows[*hit];
                    let mut joined = Vec::with_capacity(columns.len());
                    joined.extend(row.iter().cloned());
                    joined.extend(
                        right_columns
                            .iter()
                            .map(|index| cell(right_row, *index).to_string()),
                    );
                    rows.push(joined);
                }
            }
            None => {
                let mut joined = row;
                joined.resize(columns.len(), String::new());
                rows.push(joined);
            }
        }
    }

    Ok(SheetTable {
        sheet_name: left.sheet_name,
        columns,
        rows,
    })
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or_default()
}

fn resolve_column_name(existing: &[String], column: &str, sheet_name: &str) -> String {
    let taken = |candidate: &str| existing.iter().any(|name| name == candidate);
    if !taken(column) {
        return column.to_string();
    }

    let base = format!("{column}_{sheet_name}");
    if !taken(&base) {
        return base;
    }

    let mut counter = 2;
    loop {
        let candidate = format!("{base}_{counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn missing_key(table: &SheetTable, key: &str) -> ToolError {
    ToolError::MissingJoinColumn {
        sheet: table.sheet_name.clone(),
        column: key.to_string(),
    }
}
