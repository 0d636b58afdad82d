use chrono::NaiveDate;

/// A raw spreadsheet cell as read from a workbook, before any merge rule has
/// turned it into display text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank or unset cell.
    #[default]
    Empty,
    /// Text literal.
    Text(String),
    /// Numeric literal. Spreadsheets store integers as floats too.
    Number(f64),
    /// Calendar date. Any time-of-day component is dropped on read.
    Date(NaiveDate),
}

impl CellValue {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Returns true for blank cells. Empty text is not blank.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// A worksheet with a header row and typed data rows.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// 1-based spreadsheet row number of the header row.
    pub header_row: usize,
}

impl Sheet {
    /// Creates an empty sheet whose header sits on the first spreadsheet row.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            header_row: 1,
        }
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Position of the named column.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Spreadsheet row number of the data row at `index`.
    pub fn row_number(&self, index: usize) -> usize {
        self.header_row + 1 + index
    }
}

/// An ordered collection of sheets held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, replacing any existing sheet with the same name.
    pub fn insert(&mut self, sheet: Sheet) {
        match self.sheets.iter_mut().find(|existing| existing.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// A table whose cells have all been rendered to text, ready to be
/// materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// `(rows, columns)` of the table.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Returns the cell at `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// Returns the indices of rows whose `column` cell equals `value`.
    pub fn rows_where(&self, column: &str, value: &str) -> Vec<usize> {
        let Some(index) = self.column_index(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(index).map(String::as_str) == Some(value))
            .map(|(row_index, _)| row_index)
            .collect()
    }
}
