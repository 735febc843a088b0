use unit_ledger::ingestion::delimited::{parse_delimited_bytes, parse_delimited_str, sniff_delimiter};
use unit_ledger::ingestion::{ingest_from_path, IngestionOptions};
use unit_ledger::types::{FieldType, Value};

#[test]
fn ingest_fixture_from_path() {
    let out = ingest_from_path("tests/fixtures/units.csv", &IngestionOptions::default()).unwrap();

    assert_eq!(
        out.fields,
        vec![
            "Unit Name",
            "Phase: Phase Name",
            "Unit Type",
            "Building Name",
            "Number of rooms",
            "Unit Status",
            "Unit Price",
            "Unit Gross Area",
        ]
    );
    assert_eq!(out.row_count(), 5);
    assert_eq!(out.data[3].get("Phase: Phase Name"), Some(&Value::text("South Phase")));
    assert_eq!(out.data[3].get("Unit Gross Area"), Some(&Value::text("")));
    assert_eq!(out.data[2].get("Unit Price"), Some(&Value::text("")));

    let price = out.field_info("Unit Price").unwrap();
    assert_eq!(price.field_type, FieldType::Number);
    assert_eq!(price.example, Value::Number(250000.0));
    assert_eq!(price.label, "Unit Price");

    let status = out.field_info("Unit Status").unwrap();
    assert_eq!(status.field_type, FieldType::String);
    assert_eq!(status.example, Value::text("Available"));
}

#[test]
fn every_key_in_detected_fields_is_a_field() {
    let out = ingest_from_path("tests/fixtures/units.csv", &IngestionOptions::default()).unwrap();
    for key in out.detected_fields.keys() {
        assert!(out.fields.contains(key));
    }
    for record in &out.data {
        assert_eq!(record.keys().collect::<Vec<_>>(), out.fields.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

#[test]
fn reingesting_identical_bytes_is_stable() {
    let bytes = std::fs::read("tests/fixtures/units.csv").unwrap();
    let a = parse_delimited_bytes(&bytes).unwrap();
    let b = parse_delimited_bytes(&bytes).unwrap();
    assert_eq!(a.fields, b.fields);
    assert_eq!(a.row_count(), b.row_count());

    let blank_headers = "Name,,\nAcme,1,2\n";
    assert_eq!(
        parse_delimited_str(blank_headers).unwrap().fields,
        parse_delimited_str(blank_headers).unwrap().fields
    );
}

#[test]
fn tab_and_pipe_files_are_sniffed() {
    let tsv = parse_delimited_str("Name\tPrice\nAcme\t100\n").unwrap();
    assert_eq!(tsv.fields, vec!["Name", "Price"]);
    assert_eq!(tsv.data[0].get("Price"), Some(&Value::text("100")));

    let piped = parse_delimited_str("Name|Price|Area\nAcme|100|50\n").unwrap();
    assert_eq!(piped.fields.len(), 3);
}

#[test]
fn later_rows_are_split_with_the_first_line_delimiter() {
    assert_eq!(sniff_delimiter("Name;Price"), b';');
    let out = parse_delimited_str("Name;Price\nAcme,Inc;100\n").unwrap();
    assert_eq!(out.data[0].get("Name"), Some(&Value::text("Acme,Inc")));
}

#[test]
fn crlf_line_endings_are_handled() {
    let out = parse_delimited_str("Name,Price\r\nAcme,100\r\nBeta,200\r\n").unwrap();
    assert_eq!(out.row_count(), 2);
    assert_eq!(out.data[1].get("Price"), Some(&Value::text("200")));
}
