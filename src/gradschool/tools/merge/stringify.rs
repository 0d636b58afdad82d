use crate::gradschool::tools::model::CellValue;

/// Display format for date cells.
pub const DATE_FORMAT: &str = "%m/%d/%y";
/// Text reported for a blank requirement cell.
pub const NOT_APPLICABLE: &str = "N/A";

/// Renders a cell the way it would naturally read, with blanks as `""`.
///
/// Integral numbers print without a fractional part, so `3.0` reads `3`.
pub fn natural_text(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(text) => text.clone(),
        CellValue::Number(number) => number.to_string(),
        CellValue::Date(date) => date.format(DATE_FORMAT).to_string(),
    }
}

/// Renders a cell of the given column as display text.
///
/// Blank cells of requirement columns read `N/A`; every other blank reads
/// `""`.
pub fn stringify_cell(value: &CellValue, is_requirement_column: bool) -> String {
    match value {
        CellValue::Empty if is_requirement_column => NOT_APPLICABLE.to_string(),
        other => natural_text(other),
    }
}
