//! Tests for report assembly and file output

use crate::app::models::{
    ControllerDir, PrimaryRow, SetpointName, SetpointValue, Setpoints, SignalFields, TagRecord,
};
use crate::app::services::report_assembler::{
    ReportWriter, assemble_report, report_frame, report_row, staging_path,
};
use crate::app::services::tag_registry::TagRegistry;
use crate::config::{ReportFormat, SetpointLayout};
use crate::constants::REPORT_COLUMNS;
use crate::Error;
use std::path::PathBuf;
use tempfile::TempDir;

fn t100() -> TagRecord {
    let controller = ControllerDir {
        site_id: "BCVU1151".to_string(),
        controller_id: "CTRL01".to_string(),
        path: PathBuf::from("unused"),
    };
    TagRecord::from_primary(
        &controller,
        PrimaryRow {
            tag_name: "T100".to_string(),
            comment: "comment".to_string(),
            instrument_type: "USD-F64".to_string(),
            high_scale: "5".to_string(),
            low_scale: "10".to_string(),
            engineering_unit: "PSI".to_string(),
        },
    )
}

fn with_signal(mut tag: TagRecord) -> TagRecord {
    tag.signal = Some(SignalFields {
        io_address: "0x1A".to_string(),
        access_type: "AO".to_string(),
        scan_name: "SCAN1".to_string(),
        conversion_type: "CONV1".to_string(),
    });
    tag
}

fn with_pl_ll(mut tag: TagRecord) -> TagRecord {
    let mut setpoints = Setpoints::new();
    setpoints.insert(SetpointName::PL, SetpointValue::Real(2.0));
    setpoints.insert(SetpointName::LL, SetpointValue::Real(1.0));
    tag.setpoints = Some(setpoints);
    tag
}

#[test]
fn test_base_columns_follow_header() {
    let row = report_row(&with_signal(t100()), SetpointLayout::Named);

    assert_eq!(row.width(), REPORT_COLUMNS.len());
    assert_eq!(row.cell(0), Some("BCVU1151"));
    assert_eq!(row.cell(1), Some("CTRL01"));
    assert_eq!(row.cell(2), Some("T100"));
    assert_eq!(row.cell(3), Some("comment"));
    assert_eq!(row.cell(4), Some("USD-F64"));
    assert_eq!(row.cell(5), Some("10"));
    assert_eq!(row.cell(6), Some("5"));
    assert_eq!(row.cell(7), Some("PSI"));
    assert_eq!(row.cell(8), Some("0x1A"));
    assert_eq!(row.cell(9), Some("AO"));
    assert_eq!(row.cell(10), Some("SCAN1"));
    assert_eq!(row.cell(11), Some("CONV1"));
    assert!(row.cells()[12..].iter().all(Option::is_none));
}

#[test]
fn test_tag_without_signal_has_blank_signal_cells() {
    let row = report_row(&with_pl_ll(t100()), SetpointLayout::Named);

    assert!(row.cells()[8..12].iter().all(Option::is_none));
    assert_eq!(row.cell(12), Some("1.0"));
}

#[test]
fn test_named_layout_places_values_by_name() {
    let row = report_row(&with_pl_ll(with_signal(t100())), SetpointLayout::Named);

    assert_eq!(row.width(), 16);
    assert_eq!(row.cell(12), Some("1.0")); // LL
    assert_eq!(row.cell(13), Some("2.0")); // PL
    assert_eq!(row.cell(14), None); // PH
    assert_eq!(row.cell(15), None); // HH
}

#[test]
fn test_positional_layout_keeps_store_order() {
    let row = report_row(&with_pl_ll(with_signal(t100())), SetpointLayout::Positional);

    assert_eq!(row.width(), 14);
    assert_eq!(row.cell(8), Some("0x1A"));
    assert_eq!(row.cell(12), Some("2.0"));
    assert_eq!(row.cell(13), Some("1.0"));

    let bare = report_row(&t100(), SetpointLayout::Positional);
    assert_eq!(bare.width(), 12);
}

#[test]
fn test_assemble_report_follows_registry_order() {
    let mut registry = TagRegistry::default();
    let mut second = t100();
    second.tag_name = "A000".to_string();
    registry.register_primary(t100()).unwrap();
    registry.register_primary(second).unwrap();

    let rows = assemble_report(&registry, SetpointLayout::Named);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cell(2), Some("T100"));
    assert_eq!(rows[1].cell(2), Some("A000"));
}

#[test]
fn test_report_frame_pads_short_rows() {
    let rows = vec![
        report_row(&with_pl_ll(with_signal(t100())), SetpointLayout::Positional),
        report_row(&t100(), SetpointLayout::Positional),
    ];

    let df = report_frame(&rows).unwrap();
    assert_eq!(df.width(), 16);
    assert_eq!(df.height(), 2);

    let ll = df.column("LL").unwrap().str().unwrap();
    assert_eq!(ll.get(0), Some("2.0"));
    assert_eq!(ll.get(1), None);
}

#[test]
fn test_empty_report_still_has_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");

    ReportWriter::new(ReportFormat::Csv).write(&[], &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim_end(), REPORT_COLUMNS.join(","));
}

#[test]
fn test_write_csv_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out").join("report.csv");
    let rows = vec![
        report_row(&with_pl_ll(with_signal(t100())), SetpointLayout::Named),
        report_row(&t100(), SetpointLayout::Named),
    ];

    ReportWriter::new(ReportFormat::Csv).write(&rows, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], REPORT_COLUMNS.join(","));
    assert_eq!(
        lines[1],
        "BCVU1151,CTRL01,T100,comment,USD-F64,10,5,PSI,0x1A,AO,SCAN1,CONV1,1.0,2.0,,"
    );
    assert_eq!(
        lines[2],
        "BCVU1151,CTRL01,T100,comment,USD-F64,10,5,PSI,,,,,,,,"
    );
}

#[test]
fn test_write_parquet_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.parquet");
    let rows = vec![report_row(&with_signal(t100()), SetpointLayout::Named)];

    ReportWriter::new(ReportFormat::Parquet)
        .write(&rows, &path)
        .unwrap();

    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 0);
}

#[test]
fn test_unwritable_target_is_report_write_error() {
    let temp_dir = TempDir::new().unwrap();
    // A directory where the file should go cannot be opened for writing
    let path = temp_dir.path().join("report.csv");
    std::fs::create_dir(&path).unwrap();

    let result = ReportWriter::new(ReportFormat::Csv).write(&[], &path);
    assert!(matches!(result, Err(Error::ReportWrite { .. })));
}

fn staging_leftovers(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".partial"))
        .collect()
}

#[test]
fn test_staging_path_is_a_sibling() {
    let path = PathBuf::from("out").join("UGS Extract_2024-03-15.csv");
    assert_eq!(
        staging_path(&path),
        PathBuf::from("out").join("UGS Extract_2024-03-15.csv.partial")
    );
}

#[test]
fn test_failed_write_leaves_no_partial_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.csv");
    std::fs::create_dir(&path).unwrap();
    let rows = vec![report_row(&with_signal(t100()), SetpointLayout::Named)];

    let result = ReportWriter::new(ReportFormat::Csv).write(&rows, &path);

    match result {
        Err(Error::ReportWrite { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ReportWrite, got {:?}", other),
    }
    assert!(path.is_dir());
    assert!(staging_leftovers(temp_dir.path()).is_empty());
}

#[test]
fn test_successful_write_replaces_report_without_leftovers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.csv");
    std::fs::write(&path, "stale\n").unwrap();

    ReportWriter::new(ReportFormat::Csv).write(&[], &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim_end(), REPORT_COLUMNS.join(","));
    assert!(staging_leftovers(temp_dir.path()).is_empty());
}
