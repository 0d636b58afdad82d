use crate::gradschool::tools::layout::SheetLayout;
use crate::gradschool::tools::model::{CellValue, Sheet};

/// Forces a sheet onto the layout's allow-list and applies its renames.
///
/// The result holds exactly the allow-listed columns in layout order. Columns
/// the sheet lacks are synthesized as empty text in every row; columns not on
/// the allow-list are dropped.
pub fn project_sheet(sheet: &Sheet, layout: &SheetLayout) -> Sheet {
    let sources: Vec<Option<usize>> = layout
        .columns
        .iter()
        .map(|column| sheet.column_index(column))
        .collect();

    let columns = layout
        .columns
        .iter()
        .map(|column| layout.output_name(column).to_string())
        .collect();

    let mut projected = Sheet {
        name: sheet.name.clone(),
        columns,
        rows: Vec::with_capacity(sheet.rows.len()),
        header_row: sheet.header_row,
    };

    for row in &sheet.rows {
        let cells = sources
            .iter()
            .map(|source| match source {
                Some(index) => row.get(*index).cloned().unwrap_or_default(),
                None => CellValue::Text(String::new()),
            })
            .collect();
        projected.rows.push(cells);
    }

    projected
}
