//! Excel出力の統合テスト

mod support;

use calamine::{open_workbook_auto, Data, Reader};
use ontrack_rust::export::{write_report, FAILURE_SHEET, TABLE_SHEET};
use ontrack_rust::reference::load_reference_data;
use ontrack_rust::table::{build_table, TableRequest};
use support::sample_config;
use tempfile::tempdir;

#[test]
fn test_export_table_and_failures() {
    let dir = tempdir().unwrap();
    let config = sample_config(dir.path());
    let refs = load_reference_data(&config).unwrap();
    let report = build_table(&config, &refs, &TableRequest::default()).unwrap();

    let output = dir.path().join("out").join("ontrack.xlsx");
    write_report(&report, &output).unwrap();
    assert!(output.exists());

    let mut workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec![TABLE_SHEET.to_string(), FAILURE_SHEET.to_string()]
    );

    let table = workbook.worksheet_range(TABLE_SHEET).unwrap();
    assert_eq!(table.height(), report.rows.len() + 1);
    assert_eq!(table.get_value((0, 1)), Some(&Data::String("Name".into())));
    assert_eq!(
        table.get_value((1, 1)),
        Some(&Data::String("Ahmad Bin Ali".into()))
    );
    assert_eq!(table.get_value((1, 7)), Some(&Data::String("58.90".into())));
    assert_eq!(table.get_value((1, 11)), Some(&Data::Float(-245.0)));

    let failures = workbook.worksheet_range(FAILURE_SHEET).unwrap();
    assert_eq!(failures.height(), report.failures.len() + 1);
    assert_eq!(
        failures.get_value((1, 0)),
        Some(&Data::String("file unreadable".into()))
    );
}

#[test]
fn test_export_empty_report() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("empty.xlsx");

    write_report(&Default::default(), &output).unwrap();

    let mut workbook = open_workbook_auto(&output).unwrap();
    let table = workbook.worksheet_range(TABLE_SHEET).unwrap();
    assert_eq!(table.height(), 1);
}
