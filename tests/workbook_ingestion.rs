#![cfg(feature = "excel_test_writer")]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use unit_ledger::ingestion::workbook::{WorkbookOptions, parse_workbook_bytes, read_first_sheet};
use unit_ledger::ingestion::{IngestionOptions, ingest_bytes};
use unit_ledger::types::{FieldType, ParseResult, Value};

const HEADERS: [&str; 6] = [
    "Unit Name",
    "unit_status",
    "Number of rooms",
    "Unit Price",
    "Unit Gross Area",
    "Building Name",
];

// Headers on physical row 2; rows 0-1 left blank.
fn listing_xlsx() -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Units").unwrap();

    for (col, h) in HEADERS.iter().enumerate() {
        ws.write_string(2, col as u16, *h).unwrap();
    }

    // Full row.
    ws.write_string(3, 0, "A-101").unwrap();
    ws.write_string(3, 1, "available").unwrap();
    ws.write_number(3, 2, 2).unwrap();
    ws.write_number(3, 3, 250000).unwrap();
    ws.write_number(3, 4, 82.5).unwrap();
    ws.write_string(3, 5, "Tower A").unwrap();

    // 5 of 6 empty: dropped.
    ws.write_string(4, 0, "Totals").unwrap();

    // Exactly 3 of 6 empty: kept.
    ws.write_string(5, 0, "A-102").unwrap();
    ws.write_string(5, 1, "sold").unwrap();
    ws.write_string(5, 3, "310000").unwrap();

    wb.save_to_buffer().unwrap()
}

#[test]
fn header_row_is_discovered_below_blank_rows() {
    let bytes = listing_xlsx();
    let grid = read_first_sheet(&bytes).unwrap();
    assert!(grid[0].is_empty() && grid[1].is_empty());
    assert_eq!(grid[2][0], Value::text("Unit Name"));

    let out = parse_workbook_bytes(&bytes, &WorkbookOptions::default()).unwrap();
    assert_eq!(out.fields, HEADERS.to_vec());
    assert_eq!(out.data[0].get("Unit Name"), Some(&Value::text("A-101")));
}

#[test]
fn sparse_rows_are_dropped_and_half_empty_rows_kept() {
    let out = ingest_bytes("units.xlsx", &listing_xlsx(), &IngestionOptions::default()).unwrap();
    let names: Vec<String> = out.data.iter().map(|r| r.get("Unit Name").unwrap().to_string()).collect();
    assert_eq!(names, vec!["A-101", "A-102"]);
    assert_eq!(out.data[1].get("Number of rooms"), Some(&Value::Null));
    assert_eq!(out.data[1].len(), HEADERS.len());
}

#[test]
fn numeric_cells_stay_numbers_and_labels_are_humanized() {
    let out = ingest_bytes("units.xlsx", &listing_xlsx(), &IngestionOptions::default()).unwrap();
    assert_eq!(out.data[0].get("Unit Price"), Some(&Value::Number(250000.0)));
    assert_eq!(out.data[1].get("Unit Price"), Some(&Value::text("310000")));

    let rooms = out.field_info("Number of rooms").unwrap();
    assert_eq!(rooms.field_type, FieldType::Number);
    assert_eq!(rooms.example, Value::Number(2.0));

    assert_eq!(out.field_info("unit_status").unwrap().label, "Unit Status");
    assert_eq!(out.field_info("Building Name").unwrap().field_type, FieldType::String);
}

#[test]
fn only_the_first_sheet_is_read() {
    let mut wb = Workbook::new();
    let first = wb.add_worksheet();
    first.write_string(0, 0, "Unit Name").unwrap();
    first.write_string(1, 0, "A-101").unwrap();
    let second = wb.add_worksheet();
    second.write_string(0, 0, "Other").unwrap();
    second.write_string(1, 0, "ignored").unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let out = ingest_bytes("units.xlsx", &bytes, &IngestionOptions::default()).unwrap();
    assert_eq!(out.fields, vec!["Unit Name"]);
    assert_eq!(out.row_count(), 1);
}

#[test]
fn date_cells_become_iso_text() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
    let fmt = Format::new().set_num_format("yyyy-mm-dd");
    ws.write_string(0, 0, "Handover").unwrap();
    ws.write_datetime_with_format(1, 0, &date, &fmt).unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let out = ingest_bytes("units.xlsx", &bytes, &IngestionOptions::default()).unwrap();
    assert_eq!(out.data[0].get("Handover"), Some(&Value::text("2024-01-15T00:00:00.000Z")));
    assert_eq!(out.field_info("Handover").unwrap().field_type, FieldType::String);
}

#[test]
fn empty_workbook_yields_empty_result() {
    let mut wb = Workbook::new();
    wb.add_worksheet();
    let bytes = wb.save_to_buffer().unwrap();

    let out = ingest_bytes("empty.xlsx", &bytes, &IngestionOptions::default()).unwrap();
    assert_eq!(out, ParseResult::empty());
}
