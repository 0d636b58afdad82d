use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use gradschool_tools::io::SheetSource;
use gradschool_tools::layout::{MergeLayout, SheetLayout};
use gradschool_tools::merge::merge_workbook;
use gradschool_tools::model::{CellValue, Sheet, Workbook};
use gradschool_tools::ToolError;

fn sheet(name: &str, columns: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
    let mut sheet = Sheet::new(name, columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        sheet.push_row(row);
    }
    sheet
}

fn small_layout() -> MergeLayout {
    MergeLayout {
        join_column: "Program ID".into(),
        primary_sheet: "Base".into(),
        requirement_columns: vec!["Requirement".into()],
        sheets: vec![
            SheetLayout::new("Base", &["Program ID", "Program", "Requirement"]),
            SheetLayout::new("Docs", &["Program ID", "Document Type", "Max"])
                .rename("Max", "Max Documents"),
            SheetLayout::new("Notes", &["Program ID", "Note"]),
            SheetLayout::new("More Notes", &["Program ID", "Note"]),
        ],
    }
}

fn base_sheet() -> Sheet {
    sheet(
        "Base",
        &["Program ID", "Program", "Requirement"],
        vec![
            vec!["P1".into(), "Biology".into(), CellValue::Empty],
            vec![" P2 ".into(), "Chemistry".into(), "GRE".into()],
        ],
    )
}

#[test]
fn duplicate_satellite_keys_fan_out() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());
    workbook.insert(sheet(
        "Docs",
        &["Program ID", "Document Type", "Max"],
        vec![
            vec!["P1".into(), "Transcript".into(), 1.0.into()],
            vec!["P1".into(), "Resume".into(), 2.0.into()],
        ],
    ));

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    let p1_rows = merged.rows_where("Program ID", "P1");
    assert_eq!(p1_rows.len(), 2);
    for row in &p1_rows {
        assert_eq!(merged.value(*row, "Program"), Some("Biology"));
    }
    assert_eq!(merged.value(p1_rows[0], "Document Type"), Some("Transcript"));
    assert_eq!(merged.value(p1_rows[1], "Document Type"), Some("Resume"));
    assert_eq!(merged.value(p1_rows[1], "Max Documents"), Some("2"));
}

#[test]
fn unmatched_rows_get_empty_satellite_cells() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());
    workbook.insert(sheet(
        "Docs",
        &["Program ID", "Document Type", "Max"],
        vec![vec!["P1".into(), "Transcript".into(), 1.0.into()]],
    ));

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    let p2_rows = merged.rows_where("Program ID", "P2");
    assert_eq!(p2_rows.len(), 1);
    assert_eq!(merged.value(p2_rows[0], "Document Type"), Some(""));
    assert_eq!(merged.value(p2_rows[0], "Max Documents"), Some(""));
    assert_eq!(merged.value(p2_rows[0], "Program"), Some("Chemistry"));
}

#[test]
fn requirement_columns_report_not_applicable() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    assert_eq!(merged.value(0, "Requirement"), Some("N/A"));
    assert_eq!(merged.value(1, "Requirement"), Some("GRE"));
}

#[test]
fn synthesized_columns_are_empty_text() {
    let mut workbook = Workbook::new();
    workbook.insert(sheet(
        "Base",
        &["Program ID", "Unlisted"],
        vec![vec!["P1".into(), "dropped".into()]],
    ));

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    assert_eq!(merged.columns, vec!["Program ID", "Program", "Requirement"]);
    assert_eq!(merged.value(0, "Program"), Some(""));
    // Absent column, not a blank cell, so no N/A.
    assert_eq!(merged.value(0, "Requirement"), Some(""));
}

#[test]
fn missing_primary_sheet_is_fatal() {
    let mut workbook = Workbook::new();
    workbook.insert(sheet(
        "Docs",
        &["Program ID", "Document Type", "Max"],
        vec![vec!["P1".into(), "Transcript".into(), 1.0.into()]],
    ));

    let result = merge_workbook(&mut workbook, &small_layout());

    assert!(matches!(
        result,
        Err(ToolError::MissingPrimarySheet { sheet }) if sheet == "Base"
    ));
}

#[test]
fn primary_without_join_column_is_fatal() {
    let mut workbook = Workbook::new();
    workbook.insert(sheet("Base", &["Program"], vec![vec!["Biology".into()]]));

    let result = merge_workbook(&mut workbook, &small_layout());

    assert!(matches!(result, Err(ToolError::MissingPrimarySheet { .. })));
}

#[test]
fn satellites_without_join_column_are_skipped() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());
    workbook.insert(sheet(
        "Docs",
        &["Document Type"],
        vec![vec!["Transcript".into()]],
    ));
    workbook.insert(sheet(
        "Notes",
        &["Program ID", "Note"],
        vec![vec!["P2".into(), "late".into()]],
    ));

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    assert_eq!(
        merged.columns,
        vec!["Program ID", "Program", "Requirement", "Note"]
    );
    assert_eq!(merged.value(1, "Note"), Some("late"));
}

#[test]
fn colliding_columns_keep_both_values() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());
    workbook.insert(sheet(
        "Notes",
        &["Program ID", "Note"],
        vec![vec!["P1".into(), "first".into()]],
    ));
    workbook.insert(sheet(
        "More Notes",
        &["Program ID", "Note"],
        vec![vec!["P1".into(), "second".into()]],
    ));

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    assert_eq!(merged.value(0, "Note"), Some("first"));
    assert_eq!(merged.value(0, "Note_More Notes"), Some("second"));
}

#[test]
fn keys_match_across_numeric_and_text_cells() {
    let layout = MergeLayout {
        join_column: "Program ID".into(),
        primary_sheet: "Base".into(),
        requirement_columns: Vec::new(),
        sheets: vec![
            SheetLayout::new("Base", &["Program ID", "Opened"]),
            SheetLayout::new("Notes", &["Program ID", "Note"]),
        ],
    };
    let opened = NaiveDate::from_ymd_opt(2024, 8, 19).expect("valid date");

    let mut workbook = Workbook::new();
    workbook.insert(sheet(
        "Base",
        &["Program ID", "Opened"],
        vec![vec![11285619.0.into(), opened.into()]],
    ));
    workbook.insert(sheet(
        "Notes",
        &["Program ID", "Note"],
        vec![vec!["11285619.0".into(), "matched".into()]],
    ));

    let merged = merge_workbook(&mut workbook, &layout).expect("merge succeeds");

    assert_eq!(merged.rows.len(), 1);
    assert_eq!(merged.value(0, "Program ID"), Some("11285619"));
    assert_eq!(merged.value(0, "Opened"), Some("08/19/24"));
    assert_eq!(merged.value(0, "Note"), Some("matched"));
}

#[test]
fn fan_out_compounds_across_joins() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());
    workbook.insert(sheet(
        "Docs",
        &["Program ID", "Document Type"],
        vec![
            vec!["P1".into(), "Transcript".into()],
            vec!["P1".into(), "Resume".into()],
        ],
    ));
    workbook.insert(sheet(
        "Notes",
        &["Program ID", "Note"],
        vec![
            vec!["P1".into(), "a".into()],
            vec!["P1".into(), "b".into()],
            vec!["P1".into(), "c".into()],
        ],
    ));

    let merged = merge_workbook(&mut workbook, &small_layout()).expect("merge succeeds");

    assert_eq!(merged.rows_where("Program ID", "P1").len(), 6);
    assert_eq!(merged.rows_where("Program ID", "P2").len(), 1);
    assert_eq!(merged.rows.len(), 7);
}

/// Serves sheets from memory but refuses access to one of them.
struct LockedSource {
    workbook: Workbook,
    locked: &'static str,
    requested: Vec<String>,
}

impl SheetSource for LockedSource {
    fn read_sheet(&mut self, name: &str) -> gradschool_tools::Result<Sheet> {
        self.requested.push(name.to_string());
        if name == self.locked {
            return Err(ToolError::AccessDenied(PathBuf::from("export.xlsx")));
        }
        self.workbook.read_sheet(name)
    }
}

#[test]
fn access_denied_on_a_satellite_aborts_the_merge() {
    let mut workbook = Workbook::new();
    workbook.insert(base_sheet());
    workbook.insert(sheet(
        "Notes",
        &["Program ID", "Note"],
        vec![vec!["P1".into(), "late".into()]],
    ));
    let mut source = LockedSource {
        workbook,
        locked: "Docs",
        requested: Vec::new(),
    };

    let result = merge_workbook(&mut source, &small_layout());

    assert!(matches!(result, Err(ToolError::AccessDenied(_))));
    assert_eq!(source.requested, vec!["Base", "Docs"]);
}

#[test]
fn access_denied_io_error_aborts_the_merge() {
    struct DeniedSource;

    impl SheetSource for DeniedSource {
        fn read_sheet(&mut self, _name: &str) -> gradschool_tools::Result<Sheet> {
            Err(ToolError::Io(io::Error::from(io::ErrorKind::PermissionDenied)))
        }
    }

    let result = merge_workbook(&mut DeniedSource, &small_layout());

    assert!(matches!(result, Err(ToolError::Io(_))));
}
