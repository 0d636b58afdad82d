use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use calamine::{DataType, Reader, Xlsx};
use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::gradschool::tools::error::{Result, ToolError};
use crate::gradschool::tools::io::SheetSource;
use crate::gradschool::tools::model::{CellValue, Sheet};

/// An xlsx workbook opened for reading. The file handle is released when the
/// value is dropped.
pub struct ExcelWorkbook {
    path: PathBuf,
    inner: Xlsx<BufReader<File>>,
}

impl ExcelWorkbook {
    /// Opens the workbook at `path`.
    ///
    /// A permission failure maps to [`ToolError::AccessDenied`] and a missing
    /// file to [`ToolError::MissingInput`].
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|error| match error.kind() {
            ErrorKind::PermissionDenied => ToolError::AccessDenied(path.to_path_buf()),
            ErrorKind::NotFound => ToolError::MissingInput(path.to_path_buf()),
            _ => ToolError::Io(error),
        })?;
        let inner = Xlsx::new(BufReader::new(file))?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SheetSource for ExcelWorkbook {
    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        let range_result = self
            .inner
            .worksheet_range(name)
            .ok_or_else(|| ToolError::MissingSheet(name.to_string()))?;
        let range = range_result.map_err(ToolError::from)?;
        Ok(range_to_sheet(name, &range))
    }
}

/// Converts a worksheet range into a [`Sheet`], treating its first row as the
/// header.
pub fn range_to_sheet(name: &str, range: &calamine::Range<DataType>) -> Sheet {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => header_names(first_row),
        None => Vec::new(),
    };

    let mut sheet = Sheet::new(name, headers);
    if let Some((start_row, _)) = range.start() {
        sheet.header_row = start_row as usize + 1;
    }

    for row in rows {
        sheet.push_row(row.iter().map(cell_value).collect());
    }

    sheet
}

/// Names header cells. Blank headers become `Unnamed: <index>` and repeated
/// names get `.1`, `.2`, ... suffixes so every column stays addressable.
fn header_names(row: &[DataType]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(row.len());

    for (index, cell) in row.iter().enumerate() {
        let raw = match cell_value(cell) {
            CellValue::Empty => format!("Unnamed: {index}"),
            CellValue::Text(text) => text,
            CellValue::Number(number) => number.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        };

        let mut name = raw.clone();
        let mut counter = 1;
        while seen.contains(&name) {
            name = format!("{raw}.{counter}");
            counter += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// Maps a calamine cell onto the typed cell model.
pub fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        DataType::String(value) if value.is_empty() => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(true) => CellValue::text("True"),
        DataType::Bool(false) => CellValue::text("False"),
        DataType::DateTime(serial) => excel_serial_to_date(*serial)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(*serial)),
        DataType::DateTimeIso(value) => parse_iso_date(value)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(value.clone())),
        other => CellValue::Text(other.to_string()),
    }
}

/// Converts an Excel 1900-system serial into a calendar date, dropping the
/// time of day.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.floor() as u64;
    // Serials before 1900-03-01 sit on the far side of the phantom 1900-02-29.
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_days(Days::new(days))
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|datetime| datetime.date())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serials_map_to_calendar_dates() {
        assert_eq!(
            excel_serial_to_date(45000.75),
            NaiveDate::from_ymd_opt(2023, 3, 15)
        );
        assert_eq!(excel_serial_to_date(1.0), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(excel_serial_to_date(-1.0), None);
    }

    #[test]
    fn cells_map_to_typed_values() {
        assert_eq!(cell_value(&DataType::Empty), CellValue::Empty);
        assert_eq!(cell_value(&DataType::String(String::new())), CellValue::Empty);
        assert_eq!(cell_value(&DataType::String("007".into())), CellValue::text("007"));
        assert_eq!(cell_value(&DataType::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&DataType::Bool(true)), CellValue::text("True"));
        assert_eq!(
            cell_value(&DataType::DateTimeIso("2024-01-05T00:00:00".into())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date"))
        );
    }

    #[test]
    fn headers_are_named_and_deduplicated() {
        let row = vec![
            DataType::String("Max".into()),
            DataType::Empty,
            DataType::String("Max".into()),
            DataType::Float(2024.0),
        ];

        assert_eq!(header_names(&row), vec!["Max", "Unnamed: 1", "Max.1", "2024"]);
    }
}
