use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, instrument};

use crate::gradschool::tools::audit::{self, AuditConfig, AuditReport};
use crate::gradschool::tools::error::{Result, ToolError};
use crate::gradschool::tools::io::SheetSource;
use crate::gradschool::tools::io::excel_read::ExcelWorkbook;
use crate::gradschool::tools::io::excel_write;
use crate::gradschool::tools::layout::MergeLayout;
use crate::gradschool::tools::merge;

/// Timestamp format embedded in output file names.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%m.%d.%y %I.%M %p";
const PREVIEW_ROWS: usize = 5;

/// Builds the output path `<stem>_merged_<timestamp>.xlsx`, placed in
/// `output_dir` or beside the input.
pub fn merged_output_path(input: &Path, output_dir: Option<&Path>, now: NaiveDateTime) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{stem}_merged_{}.xlsx", now.format(OUTPUT_TIMESTAMP_FORMAT));

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Merges the workbook at `input` and writes the result beside it (or into
/// `output_dir`). Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn merge_file(input: &Path, output_dir: Option<&Path>, layout: &MergeLayout) -> Result<PathBuf> {
    let merged = {
        let mut workbook = ExcelWorkbook::open(input)?;
        info!(path = %workbook.path().display(), "opened workbook");
        merge::merge_workbook(&mut workbook, layout)?
    };

    for row in merged.rows.iter().take(PREVIEW_ROWS) {
        debug!(?row, "merged row");
    }

    let output = merged_output_path(input, output_dir, Local::now().naive_local());
    let (rows, columns) = merged.shape();
    info!(output = %output.display(), rows, columns, "saving merged data");

    excel_write::write_text_workbook(&output, &merged)?;
    verify_output(&output)?;
    Ok(output)
}

/// Fails when the written file is missing or has no content.
pub fn verify_output(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|_| ToolError::MissingOutput(path.to_path_buf()))?;
    let bytes = metadata.len();
    info!(path = %path.display(), bytes, "file created");
    if bytes == 0 {
        return Err(ToolError::EmptyOutput(path.to_path_buf()));
    }
    Ok(bytes)
}

/// Audits the review decisions stored in the workbook at `input`.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn audit_file(input: &Path, config: &AuditConfig) -> Result<AuditReport> {
    let (review, final_table) = {
        let mut workbook = ExcelWorkbook::open(input)?;
        (
            workbook.read_sheet(&config.review_sheet)?,
            workbook.read_sheet(&config.final_sheet)?,
        )
    };
    info!(
        review_rows = review.rows.len(),
        final_rows = final_table.rows.len(),
        "read audit sheets"
    );

    let report = audit::audit_decisions(&review, &final_table, config)?;
    info!(
        publishable = report.publishable,
        ignored = report.ignored,
        blank = report.blank_decisions,
        final_pairs = report.final_pairs,
        issues = report.issues.len(),
        "audit finished"
    );
    Ok(report)
}
