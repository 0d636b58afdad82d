//! Merge-and-normalize pipeline.
//!
//! Each sheet named by the [`MergeLayout`] is read, checked for the join
//! column, projected onto its allow-list, stringified, and then left-joined
//! onto the primary sheet in layout order.

pub mod join;
pub mod key;
pub mod project;
pub mod stringify;

use tracing::{debug, error, info, warn};

use crate::gradschool::tools::error::{Result, ToolError};
use crate::gradschool::tools::io::SheetSource;
use crate::gradschool::tools::layout::{MergeLayout, SheetLayout};
use crate::gradschool::tools::model::{Sheet, SheetTable};

pub use join::left_join;
pub use key::{normalize_key, normalize_key_text};
pub use project::project_sheet;
pub use stringify::{natural_text, stringify_cell};

/// Reads every sheet of the layout from `source` and merges them into one
/// text table anchored on the primary sheet.
///
/// Sheets that cannot be read or lack the join column are logged and skipped.
/// The run fails when the primary sheet is among them, or when the workbook
/// itself cannot be accessed.
pub fn merge_workbook<S: SheetSource>(source: &mut S, layout: &MergeLayout) -> Result<SheetTable> {
    let mut prepared: Vec<SheetTable> = Vec::new();

    for sheet_layout in &layout.sheets {
        info!(sheet = %sheet_layout.name, "processing sheet");
        match prepare_sheet(source, sheet_layout, layout) {
            Ok(table) => prepared.push(table),
            Err(error) if error.is_access_denied() => return Err(error),
            Err(error @ ToolError::MissingJoinColumn { .. }) => {
                warn!(sheet = %sheet_layout.name, %error, "skipping sheet");
            }
            Err(error) => {
                error!(sheet = %sheet_layout.name, %error, "error processing sheet");
            }
        }
    }

    let primary_index = prepared
        .iter()
        .position(|table| table.sheet_name == layout.primary_sheet)
        .ok_or_else(|| ToolError::MissingPrimarySheet {
            sheet: layout.primary_sheet.clone(),
        })?;
    let primary = prepared.remove(primary_index);

    join_sheets(primary, &prepared, &layout.join_column)
}

/// Left-joins every satellite onto the primary table in order.
pub fn join_sheets(primary: SheetTable, satellites: &[SheetTable], key: &str) -> Result<SheetTable> {
    let mut merged = primary;
    for satellite in satellites {
        merged = left_join(merged, satellite, key)?;
        let (rows, columns) = merged.shape();
        info!(sheet = %satellite.sheet_name, rows, columns, "merged sheet");
    }
    Ok(merged)
}

fn prepare_sheet<S: SheetSource>(
    source: &mut S,
    sheet_layout: &SheetLayout,
    layout: &MergeLayout,
) -> Result<SheetTable> {
    let sheet = source.read_sheet(&sheet_layout.name)?;
    info!(
        sheet = %sheet.name,
        rows = sheet.rows.len(),
        columns = sheet.columns.len(),
        "read sheet"
    );

    if !sheet.has_column(&layout.join_column) {
        return Err(ToolError::MissingJoinColumn {
            sheet: sheet.name,
            column: layout.join_column.clone(),
        });
    }

    let projected = project_sheet(&sheet, sheet_layout);
    let table = stringify_sheet(&projected, layout);
    debug!(sheet = %table.sheet_name, columns = ?table.columns, "prepared sheet");
    Ok(table)
}

/// Renders every cell of a projected sheet to text, normalizing the join key.
pub fn stringify_sheet(sheet: &Sheet, layout: &MergeLayout) -> SheetTable {
    let rules: Vec<CellRule> = sheet
        .columns
        .iter()
        .map(|column| {
            if *column == layout.join_column {
                CellRule::JoinKey
            } else if layout.is_requirement_column(column) {
                CellRule::Requirement
            } else {
                CellRule::Plain
            }
        })
        .collect();

    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&rules)
                .map(|(cell, rule)| match rule {
                    CellRule::JoinKey => normalize_key(cell),
                    CellRule::Requirement => stringify_cell(cell, true),
                    CellRule::Plain => stringify_cell(cell, false),
                })
                .collect()
        })
        .collect();

    SheetTable {
        sheet_name: sheet.name.clone(),
        columns: sheet.columns.clone(),
        rows,
    }
}

#[derive(Clone, Copy)]
enum CellRule {
    JoinKey,
    Requirement,
    Plain,
}
