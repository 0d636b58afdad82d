use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::gradschool::tools::error::Result;
use crate::gradschool::tools::model::SheetTable;

/// Worksheet name used for merged output.
pub const MERGED_SHEET: &str = "Merged Data";
/// Excel number format code for text.
const TEXT_FORMAT: &str = "@";

/// Writes the table to the given path as a single worksheet.
///
/// Every cell, header included, is written as a string with the Text number
/// format so spreadsheet viewers do not reinterpret keys such as `007` or
/// date-like strings.
pub fn write_text_workbook(path: &Path, table: &SheetTable) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let text = Format::new().set_num_format(TEXT_FORMAT);

    let worksheet = workbook_writer.add_worksheet();
    worksheet.set_name(MERGED_SHEET)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header.as_str(), &text)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string_with_format(
                (row_idx + 1) as u32,
                col_idx as u16,
                cell.as_str(),
                &text,
            )?;
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}
