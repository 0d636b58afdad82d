//! Sheet layouts describing which tabs the merger reads and how each one is
//! shaped before joining.
//!
//! The built-in [`MergeLayout::cas`] layout covers the program export
//! workbook. Other exports can be merged by describing them in a JSON file:
//!
//! ```json
//! {
//!   "join_column": "Program ID",
//!   "primary_sheet": "Program Attributes",
//!   "requirement_columns": ["Standardized Test Score Requirement"],
//!   "sheets": [
//!     { "name": "Program Attributes", "columns": ["Program ID", "Program"] },
//!     { "name": "Documents", "columns": ["Program ID", "Max"],
//!       "renames": { "Max": "Max Documents" } }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::gradschool::tools::error::{Result, ToolError};

/// Column every CAS sheet is joined on.
pub const PROGRAM_ID: &str = "Program ID";
/// Anchor sheet of the CAS merge.
pub const PROGRAM_ATTRIBUTES: &str = "Program Attributes";

/// Allow-list and renames applied to one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Sheet (tab) name in the workbook.
    pub name: String,
    /// Columns kept from the sheet, in output order.
    pub columns: Vec<String>,
    /// Source column name → output column name.
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
}

impl SheetLayout {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            renames: BTreeMap::new(),
        }
    }

    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.renames.insert(from.to_string(), to.to_string());
        self
    }

    /// Output name of `column` after renames.
    pub fn output_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.renames.get(column).map(String::as_str).unwrap_or(column)
    }
}

/// Complete description of a merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeLayout {
    pub join_column: String,
    pub primary_sheet: String,
    /// Columns whose blank cells are reported as `N/A` instead of empty.
    #[serde(default)]
    pub requirement_columns: Vec<String>,
    /// Sheets in processing order.
    pub sheets: Vec<SheetLayout>,
}

impl Default for MergeLayout {
    fn default() -> Self {
        Self::cas()
    }
}

impl MergeLayout {
    /// Layout of the program export workbook.
    pub fn cas() -> Self {
        Self {
            join_column: PROGRAM_ID.to_string(),
            primary_sheet: PROGRAM_ATTRIBUTES.to_string(),
            requirement_columns: vec![
                "Standardized Test Score Requirement".to_string(),
                "Accepted English Language Tests".to_string(),
            ],
            sheets: vec![
                SheetLayout::new(
                    PROGRAM_ATTRIBUTES,
                    &[
                        PROGRAM_ID,
                        "Application Deadline",
                        "Application Type",
                        "Campus",
                        "Deadline",
                        "Delivery",
                        "Full-Time/Part-Time",
                        "Open Date",
                        "Program",
                        "Start Term",
                        "Start Year",
                        "Status",
                        "Updated Date",
                        "Standardized Test Score Requirement",
                        "Accepted English Language Tests",
                    ],
                ),
                SheetLayout::new(
                    "Recommendations",
                    &[
                        PROGRAM_ID,
                        "Evaluation Type",
                        "Max",
                        "Min",
                        "Minimum Required for Application to be submitted for review",
                    ],
                )
                .rename("Max", "Max Evaluations")
                .rename("Min", "Min Evaluations"),
                SheetLayout::new(
                    "Questions",
                    &[
                        PROGRAM_ID,
                        "Question",
                        "Question Block",
                        "Question Type",
                        "Required",
                    ],
                ),
                SheetLayout::new("Answers", &[PROGRAM_ID, "Answer Value"]),
                SheetLayout::new(
                    "Documents",
                    &[
                        PROGRAM_ID,
                        "Application Instructions",
                        "Document Type",
                        "Max",
                        "Min",
                    ],
                )
                .rename("Max", "Max Documents")
                .rename("Min", "Min Documents"),
            ],
        }
    }

    /// Loads and validates a layout from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let layout: MergeLayout = serde_json::from_str(&data)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn is_requirement_column(&self, column: &str) -> bool {
        self.requirement_columns.iter().any(|name| name == column)
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Checks that the layout can anchor a merge.
    pub fn validate(&self) -> Result<()> {
        if self.join_column.trim().is_empty() {
            return Err(ToolError::InvalidLayout("join column is empty".into()));
        }
        if self.sheet(&self.primary_sheet).is_none() {
            return Err(ToolError::InvalidLayout(format!(
                "primary sheet '{}' is not listed in the layout",
                self.primary_sheet
            )));
        }

        for (index, sheet) in self.sheets.iter().enumerate() {
            if self.sheets[..index].iter().any(|other| other.name == sheet.name) {
                return Err(ToolError::InvalidLayout(format!(
                    "sheet '{}' is listed more than once",
                    sheet.name
                )));
            }
            if !sheet.columns.contains(&self.join_column) {
                return Err(ToolError::InvalidLayout(format!(
                    "sheet '{}' does not keep the join column '{}'",
                    sheet.name, self.join_column
                )));
            }
            if sheet.renames.contains_key(&self.join_column) {
                return Err(ToolError::InvalidLayout(format!(
                    "sheet '{}' renames the join column '{}'",
                    sheet.name, self.join_column
                )));
            }

            let mut output_names = HashSet::new();
            for column in &sheet.columns {
                let output = sheet.output_name(column);
                if !output_names.insert(output) {
                    return Err(ToolError::InvalidLayout(format!(
                        "sheet '{}' produces column '{}' more than once",
                        sheet.name, output
                    )));
                }
            }
        }

        Ok(())
    }
}
