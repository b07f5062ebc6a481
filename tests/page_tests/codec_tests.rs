//! Tests for the page codec
//!
//! These tests verify:
//! - Exact on-disk layout (header, markers, rows)
//! - Round-trips at page boundaries (0, PAGE_SIZE, PAGE_SIZE + 1 records)
//! - Values that look like page markers
//! - Corruption detection
//! - Missing files decode as empty

use typestore::page::{decode_pages, encode_pages, PageReader, PageWriter, Record, PAGE_SIZE};
use typestore::StoreError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn fields() -> Vec<String> {
    vec!["name".to_string(), "house".to_string(), "age".to_string()]
}

fn make_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| vec![format!("name{}", i), "Stark".to_string(), format!("{}", 20 + i)])
        .collect()
}

fn round_trip(records: &[Record]) -> Vec<Record> {
    let bytes = encode_pages(&fields(), records, PAGE_SIZE).unwrap();
    decode_pages(&bytes)
        .unwrap()
        .into_iter()
        .flat_map(|page| page.records)
        .collect()
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_encode_empty_writes_header_only() {
    let bytes = encode_pages(&fields(), &[], PAGE_SIZE).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "name,house,age\n");
}

#[test]
fn test_encode_layout() {
    let records = vec![
        vec!["Jon".to_string(), "Stark".to_string(), "16".to_string()],
        vec!["Arya".to_string(), "Stark".to_string(), "11".to_string()],
        vec!["Tyrion".to_string(), "Lannister".to_string(), "32".to_string()],
    ];

    let bytes = encode_pages(&fields(), &records, 2).unwrap();
    let expected = "name,house,age\n\
                    PAGE_HEADER 1 2\n\
                    Jon,Stark,16\n\
                    Arya,Stark,11\n\
                    PAGE_HEADER 2 1\n\
                    Tyrion,Lannister,32\n";

    assert_eq!(String::from_utf8(bytes).unwrap(), expected);
}

#[test]
fn test_writer_summary() {
    let mut writer = PageWriter::new(Vec::new(), &fields(), PAGE_SIZE).unwrap();
    for record in make_records(25) {
        writer.add(record).unwrap();
    }
    let (_, summary) = writer.finish().unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.records, 25);
}

#[test]
fn test_zero_page_size_rejected() {
    let result = PageWriter::new(Vec::new(), &fields(), 0);
    assert!(matches!(result, Err(StoreError::Config(_))));
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_empty() {
    assert!(round_trip(&[]).is_empty());
}

#[test]
fn test_round_trip_exactly_one_page() {
    let records = make_records(PAGE_SIZE);
    let bytes = encode_pages(&fields(), &records, PAGE_SIZE).unwrap();
    let pages = decode_pages(&bytes).unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].number, 1);
    assert_eq!(pages[0].records, records);
}

#[test]
fn test_round_trip_page_size_plus_one() {
    let records = make_records(PAGE_SIZE + 1);
    let bytes = encode_pages(&fields(), &records, PAGE_SIZE).unwrap();
    let pages = decode_pages(&bytes).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].len(), PAGE_SIZE);
    assert_eq!(pages[1].len(), 1);
    assert_eq!(pages[1].number, 2);
    assert_eq!(round_trip(&records), records);
}

#[test]
fn test_round_trip_awkward_values() {
    let records = vec![
        vec!["PAGE_HEADER 1 1".to_string(), "a,b".to_string(), "".to_string()],
        vec!["PAGE_HEADER".to_string(), "\"q\"".to_string(), "x\ny".to_string()],
    ];
    assert_eq!(round_trip(&records), records);
}

#[test]
fn test_reader_exposes_header() {
    let bytes = encode_pages(&fields(), &make_records(1), PAGE_SIZE).unwrap();
    let reader = PageReader::new(bytes.as_slice()).unwrap();

    assert_eq!(reader.header().unwrap(), fields().as_slice());
}

#[test]
fn test_reader_is_lazy() {
    // Second page is damaged; the first page still decodes.
    let text = "name\nPAGE_HEADER 1 1\na\nPAGE_HEADER 2 5\nb\n";
    let mut reader = PageReader::new(text.as_bytes()).unwrap();

    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.records, vec![vec!["a".to_string()]]);
    assert!(matches!(reader.next(), Some(Err(StoreError::Corruption(_)))));
    assert!(reader.next().is_none());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_record_outside_page() {
    let result = decode_pages(b"name\nJon\n");
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_short_page() {
    let result = decode_pages(b"name\nPAGE_HEADER 1 3\nJon\nArya\n");
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_marker_inside_page() {
    let result = decode_pages(b"name\nPAGE_HEADER 1 2\nJon\nPAGE_HEADER 2 1\nArya\n");
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_page_number_out_of_sequence() {
    let result = decode_pages(b"name\nPAGE_HEADER 2 1\nJon\n");
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_huge_declared_count() {
    let result = decode_pages(b"a\nPAGE_HEADER 1 18446744073709551615\nx\n");
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

#[test]
fn test_malformed_marker() {
    let result = decode_pages(b"name\nPAGE_HEADER one 1\nJon\n");
    assert!(matches!(result, Err(StoreError::Corruption(_))));
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_missing_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let reader = PageReader::open(&temp.path().join("absent.csv")).unwrap();

    assert!(reader.header().is_none());
    assert_eq!(reader.count(), 0);
}

#[test]
fn test_open_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("char.csv");
    let records = make_records(3);
    std::fs::write(&path, encode_pages(&fields(), &records, PAGE_SIZE).unwrap()).unwrap();

    let pages: Vec<_> = PageReader::open(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].records, records);
}
