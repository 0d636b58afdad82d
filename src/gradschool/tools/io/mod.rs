pub mod excel_read;
pub mod excel_write;

use crate::gradschool::tools::error::{Result, ToolError};
use crate::gradschool::tools::model::{Sheet, Workbook};

/// Anything sheets can be read from by name.
pub trait SheetSource {
    /// Reads the named sheet, failing when it is absent or unreadable.
    fn read_sheet(&mut self, name: &str) -> Result<Sheet>;
}

impl SheetSource for Workbook {
    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheet(name)
            .cloned()
            .ok_or_else(|| ToolError::MissingSheet(name.to_string()))
    }
}
