//! Audit of review decisions against a final translation table.
//!
//! A review sheet records one decision per candidate translation. Rows whose
//! decision publishes the translation must show up, as an `(input, output)`
//! pair, in the final table. Keys are compared with
//! [`normalize_key`](crate::merge::normalize_key), so `11285619.0` in one tab
//! matches `11285619` in the other.

use std::collections::HashSet;
use std::fmt;

use crate::gradschool::tools::error::{Result, ToolError};
use crate::gradschool::tools::merge::{natural_text, normalize_key};
use crate::gradschool::tools::model::{CellValue, Sheet};

pub const REVIEW_SHEET: &str = "Review_Workbench";
pub const FINAL_SHEET: &str = "Final_Translation_Table";

/// Decisions whose translation must appear in the final table.
pub const PUBLISHABLE_DECISIONS: [&str; 3] = ["Keep As-Is", "Use Suggestion", "Allow One-to-Many"];
pub const IGNORE_DECISION: &str = "Ignore";

const DECISION_COLUMNS: &[&str] = &["Decision"];
const FINAL_INPUT_COLUMNS: &[&str] = &["Final Translate Input", "Final_Input"];
const FINAL_OUTPUT_COLUMNS: &[&str] = &["Final Translate Output", "Final_Output"];
const CURRENT_INPUT_COLUMNS: &[&str] = &[
    "Current Translate Input",
    "Current_Input",
    "Input (Translate Input)",
];
const CURRENT_OUTPUT_COLUMNS: &[&str] = &[
    "Current Translate Output",
    "Current_Output",
    "Output (Translate Output)",
];
const TABLE_INPUT_COLUMNS: &[&str] = &["Translate Input", "Final_Input", "translate_input"];
const TABLE_OUTPUT_COLUMNS: &[&str] = &["Translate Output", "Final_Output", "translate_output"];

/// Sheet names and limits for an audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub review_sheet: String,
    pub final_sheet: String,
    /// Only the first `n` review rows are audited when set.
    pub review_row_limit: Option<usize>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            review_sheet: REVIEW_SHEET.to_string(),
            final_sheet: FINAL_SHEET.to_string(),
            review_row_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditIssueKind {
    /// A publishable decision has neither an input nor an output.
    BlankFinal,
    /// A publishable pair is absent from the final table.
    MissingFromFinal,
}

impl fmt::Display for AuditIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditIssueKind::BlankFinal => write!(f, "BLANK_FINAL"),
            AuditIssueKind::MissingFromFinal => write!(f, "MISSING_FROM_FINAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditIssue {
    /// Spreadsheet row number of the review row.
    pub row: usize,
    pub kind: AuditIssueKind,
    pub decision: String,
    pub input: String,
    pub output: String,
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AuditIssueKind::BlankFinal => write!(
                f,
                "Row {}: Decision={} but Final_Input and Final_Output are blank",
                self.row, self.decision
            ),
            AuditIssueKind::MissingFromFinal => write!(
                f,
                "Row {}: Decision={} but (Final_Input, Final_Output)=({}, {}) NOT in final table",
                self.row, self.decision, self.input, self.output
            ),
        }
    }
}

/// Outcome of an audit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub publishable: usize,
    pub ignored: usize,
    pub blank_decisions: usize,
    pub final_pairs: usize,
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Finds the first column matching any candidate, ignoring case and
/// surrounding whitespace. Candidates are tried in order.
pub fn find_column(sheet: &Sheet, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        sheet
            .columns
            .iter()
            .position(|column| column.trim().eq_ignore_ascii_case(candidate))
    })
}

fn find_column_containing(sheet: &Sheet, needle: &str) -> Option<usize> {
    sheet
        .columns
        .iter()
        .position(|column| column.to_lowercase().contains(needle))
}

/// Collects the normalized `(input, output)` pairs of the final table.
pub fn final_pairs(final_table: &Sheet) -> Result<HashSet<(String, String)>> {
    let input = find_column(final_table, TABLE_INPUT_COLUMNS)
        .or_else(|| find_column_containing(final_table, "input"));
    let output = find_column(final_table, TABLE_OUTPUT_COLUMNS)
        .or_else(|| find_column_containing(final_table, "output"));

    let (Some(input), Some(output)) = (input, output) else {
        return Err(ToolError::InvalidWorkbook(format!(
            "sheet '{}' has no translate input/output columns",
            final_table.name
        )));
    };

    let mut pairs = HashSet::new();
    for row in &final_table.rows {
        let pair = (cell_key(row, Some(input)), cell_key(row, Some(output)));
        if !pair.0.is_empty() || !pair.1.is_empty() {
            pairs.insert(pair);
        }
    }
    Ok(pairs)
}

/// Checks every publishable decision of `review` against `final_table`.
pub fn audit_decisions(review: &Sheet, final_table: &Sheet, config: &AuditConfig) -> Result<AuditReport> {
    let decision_col = find_column(review, DECISION_COLUMNS).ok_or_else(|| {
        ToolError::InvalidWorkbook(format!("sheet '{}' has no Decision column", review.name))
    })?;
    let final_input_col = find_column(review, FINAL_INPUT_COLUMNS);
    let final_output_col = find_column(review, FINAL_OUTPUT_COLUMNS);
    let current_input_col = find_column(review, CURRENT_INPUT_COLUMNS);
    let current_output_col = find_column(review, CURRENT_OUTPUT_COLUMNS);

    let pairs = final_pairs(final_table)?;
    let mut report = AuditReport {
        final_pairs: pairs.len(),
        ..AuditReport::default()
    };

    let limit = config.review_row_limit.unwrap_or(review.rows.len());
    for (index, row) in review.rows.iter().take(limit).enumerate() {
        let decision = row
            .get(decision_col)
            .map(natural_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        if decision.is_empty() {
            report.blank_decisions += 1;
            continue;
        }
        if decision == IGNORE_DECISION {
            report.ignored += 1;
            continue;
        }
        if !PUBLISHABLE_DECISIONS.contains(&decision.as_str()) {
            continue;
        }
        report.publishable += 1;

        let input = key_with_fallback(row, final_input_col, current_input_col);
        let output = key_with_fallback(row, final_output_col, current_output_col);

        let kind = if input.is_empty() && output.is_empty() {
            AuditIssueKind::BlankFinal
        } else if !pairs.contains(&(input.clone(), output.clone())) {
            AuditIssueKind::MissingFromFinal
        } else {
            continue;
        };

        report.issues.push(AuditIssue {
            row: review.row_number(index),
            kind,
            decision,
            input,
            output,
        });
    }

    Ok(report)
}

fn key_with_fallback(row: &[CellValue], primary: Option<usize>, fallback: Option<usize>) -> String {
    let value = cell_key(row, primary);
    if value.is_empty() { cell_key(row, fallback) } else { value }
}

/// Normalized key of the cell at `column`; absent columns and cells read as
/// an empty key.
fn cell_key(row: &[CellValue], column: Option<usize>) -> String {
    column
        .and_then(|index| row.get(index))
        .map(normalize_key)
        .unwrap_or_default()
}
