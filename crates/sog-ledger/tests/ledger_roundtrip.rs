use std::fs;

use chrono::{TimeZone, Utc};
use sog_ledger::{HistoryEntry, HistoryLedger};
use tempfile::tempdir;

#[test]
fn absent_file_reads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let ledger = HistoryLedger::new(dir.path().join("history.txt"));
    assert!(ledger.read_all().is_empty());
    assert!(!ledger.path().exists(), "reading must not create the log");
}

#[test]
fn append_creates_file_and_parents_lazily() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("history.txt");
    let ledger = HistoryLedger::new(&path);
    assert!(!path.exists());
    ledger
        .append(&HistoryEntry::new(2, 1, "[]", vec!["Cl".into()]))
        .expect("append");
    assert!(path.exists());
    let contents = fs::read_to_string(&path).expect("read");
    assert!(contents.ends_with('\n'));
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn appended_entries_read_back_equal() {
    let dir = tempdir().expect("tempdir");
    let ledger = HistoryLedger::new(dir.path().join("history.txt"));
    let spec = r#"[{"degree_sum": 4, "type": "min", "count": 2}]"#;
    let first = HistoryEntry::new(5, 2, spec, vec!["Cl".into(), "C~".into()]);
    let second = HistoryEntry::new(7, 0, spec, Vec::new());
    ledger.append(&first).expect("append first");
    ledger.append(&second).expect("append second");

    let entries = ledger.read_all();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].input_number(), 5);
    assert_eq!(entries[0].output_number(), 2);
    assert_eq!(entries[0].filter_spec(), spec);
    assert_eq!(entries[0].passed_graphs(), &["Cl".to_string(), "C~".to_string()]);
    assert_eq!(entries[0].timestamp(), first.timestamp());
    assert_eq!(entries[1], second);
}

#[test]
fn malformed_lines_are_skipped() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("history.txt");
    fs::write(
        &path,
        "2025-01-02 03:04:05\t4\t1\t[]\tCl\n\
         2025-01-02 03:04:06\t4\t1\n",
    )
    .expect("seed");
    let entries = HistoryLedger::new(&path).read_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].passed_graphs(), &["Cl".to_string()]);
}

#[test]
fn tolerates_bad_timestamps_crlf_and_garbage() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("history.txt");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"02/01/2025 03:04:05\t4\t1\t[]\tCl\n");
    bytes.extend_from_slice(b"\n");
    bytes.extend_from_slice(b"2025-01-02 03:04:05\t4\t1\t[]\tCl,Bw\r\n");
    bytes.extend_from_slice(&[0xff, 0xfe, b'\t', b'\n']);
    bytes.extend_from_slice(b"2025-01-02 03:04:07\t1\t0\t[]\t");
    fs::write(&path, bytes).expect("seed");

    let entries = HistoryLedger::new(&path).read_all();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].passed_graphs(), &["Cl".to_string(), "Bw".to_string()]);
    assert_eq!(
        entries[1].timestamp(),
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 7).unwrap()
    );
    assert!(entries[1].passed_graphs().is_empty());
}

#[test]
fn ledger_keeps_full_history() {
    let dir = tempdir().expect("tempdir");
    let ledger = HistoryLedger::new(dir.path().join("history.txt"));
    for run in 0..30u64 {
        ledger
            .append(&HistoryEntry::new(run, 1, "[]", vec![format!("g{run}")]))
            .expect("append");
    }
    assert_eq!(ledger.read_all().len(), 30);
    assert_eq!(ledger.recent_graphs(20).len(), 20);
}
