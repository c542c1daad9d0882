use log::Level;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rowdupe::duplicates::{Checker, DuplicateReport, DEFAULT_UNIQUE_FIELDS};
use rowdupe::error::{DedupError, ErrorKind, FileFailure};
use rowdupe::generator::{Generator, GeneratorConfig};
use rowdupe::logging::MemoryJournal;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SMALL_SOURCE: &str = r#"[
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 1, "balance": 1100},
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 2, "balance": 2200},
    {"user": "B", "age": 2, "lang_id": 2, "row_id": 3, "balance": 3300}
]"#;

fn generate_default(path: &Path) {
    let journal = MemoryJournal::new();
    Generator::new(GeneratorConfig::default(), &journal)
        .generate_into(path, &mut StdRng::seed_from_u64(17))
        .unwrap();
}

#[test]
fn test_default_collection_has_three_keys_of_four() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    generate_default(&source);

    let journal = MemoryJournal::new();
    let report = Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(
        report.keys().collect::<Vec<_>>(),
        vec!["John | 30 | 10", "Mike | 32 | 18", "Nick | 27 | 5"]
    );

    // First-seen rows are 1, 2 and 3; the replicas follow every third id
    let expected = [
        ("John | 30 | 10", [4u64, 7, 10, 13]),
        ("Mike | 32 | 18", [5, 8, 11, 14]),
        ("Nick | 27 | 5", [6, 9, 12, 15]),
    ];
    for (key, ids) in expected {
        let entries = report.get(key).unwrap();
        let got: Vec<u64> = entries
            .iter()
            .map(|e| e.duplicate_row_id.as_u64().unwrap())
            .collect();
        assert_eq!(got, ids);
        for entry in entries {
            assert_eq!(entry.duplicate_row["row_id"], entry.duplicate_row_id);
        }
    }
}

#[test]
fn test_small_source_report_contents() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(&source, SMALL_SOURCE).unwrap();

    let journal = MemoryJournal::new();
    Checker::new(&journal)
        .check(&["user", "age", "lang_id"], &source, &report_path)
        .unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    let expected = serde_json::json!({
        "A | 1 | 1": [{
            "duplicate_row_id": 2,
            "duplicate_row": {"user": "A", "age": 1, "lang_id": 1, "row_id": 2, "balance": 2200}
        }],
        "B | 2 | 2": []
    });
    assert_eq!(written, expected);
}

#[test]
fn test_report_file_round_trips_in_order() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(&source, SMALL_SOURCE).unwrap();

    let journal = MemoryJournal::new();
    let report = Checker::new(&journal)
        .check(&["user"], &source, &report_path)
        .unwrap();

    let content = fs::read_to_string(&report_path).unwrap();
    assert!(content.starts_with("{\n    \"A\": [\n"));
    let back: DuplicateReport = serde_json::from_str(&content).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_single_occurrence_keys_are_kept() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    generate_default(&source);

    let journal = MemoryJournal::new();
    let report = Checker::new(&journal)
        .check(&["row_id"], &source, &report_path)
        .unwrap();

    assert_eq!(report.len(), 15);
    assert_eq!(report.duplicate_count(), 0);
    assert!(report.iter().all(|(_, entries)| entries.is_empty()));
    assert_eq!(report.get("15"), Some(&[][..]));
}

#[test]
fn test_unknown_field_leaves_existing_report_untouched() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(&source, SMALL_SOURCE).unwrap();
    fs::write(&report_path, "previous report").unwrap();

    let journal = MemoryJournal::new();
    let err = Checker::new(&journal)
        .check(&["user", "email"], &source, &report_path)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert_eq!(fs::read_to_string(&report_path).unwrap(), "previous report");
    assert_eq!(journal.messages(Level::Error).len(), 1);
}

#[test]
fn test_unknown_field_writes_no_report() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(&source, SMALL_SOURCE).unwrap();

    let journal = MemoryJournal::new();
    let result = Checker::new(&journal).check(&["nickname"], &source, &report_path);

    assert!(matches!(result, Err(DedupError::Lookup { .. })));
    assert!(!report_path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_source() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("absent.json");
    let report_path = dir.path().join("duplicates.json");

    let journal = MemoryJournal::new();
    let err = Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap_err();

    match err {
        DedupError::Read { path, source: FileFailure::Io(io) } => {
            assert!(path.ends_with("absent.json"));
            assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected Read error, got {:?}", other),
    }
    assert!(!report_path.exists());
}

#[test]
fn test_record_missing_key_field_is_a_lookup_error() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(
        &source,
        r#"[
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 1, "balance": 5},
    {"user": "A", "age": 1, "row_id": 2, "balance": 5}
]"#,
    )
    .unwrap();

    let journal = MemoryJournal::new();
    let err = Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert_eq!(
        err.describe(),
        "(LookupError) Unknown record field: 'lang_id' (missing from record 2)"
    );
    assert!(!report_path.exists());
    assert_eq!(journal.messages(Level::Error).len(), 1);
}

#[test]
fn test_field_outside_key_may_be_missing() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(
        &source,
        r#"[
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 1},
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 2}
]"#,
    )
    .unwrap();

    let journal = MemoryJournal::new();
    let report = Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap();

    assert_eq!(report.duplicate_count(), 1);
    assert!(report_path.exists());
}

#[test]
fn test_duplicate_row_is_copied_whole() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(
        &source,
        r#"[
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 1, "balance": 5},
    {"user": "A", "age": 1, "lang_id": 1, "row_id": 2, "balance": 6, "email": "a@example.com"}
]"#,
    )
    .unwrap();

    let journal = MemoryJournal::new();
    Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap();

    let content = fs::read_to_string(&report_path).unwrap();
    let written: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        written["A | 1 | 1"][0]["duplicate_row"]["email"],
        "a@example.com"
    );
    // Row keys keep their source order
    let user = content.find("\"user\"").unwrap();
    let email = content.find("\"email\"").unwrap();
    assert!(user < email);
}

#[test]
fn test_source_that_is_not_a_list_is_a_read_error() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(&source, r#"{"user": "A"}"#).unwrap();

    let journal = MemoryJournal::new();
    let err = Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap_err();

    assert!(matches!(
        err,
        DedupError::Read {
            source: FileFailure::Json(_),
            ..
        }
    ));
    assert!(err.describe().starts_with("(ReadError) Failed to read data from file: "));
    assert!(!report_path.exists());
}

#[test]
fn test_unwritable_report_destination() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("missing").join("duplicates.json");
    fs::write(&source, SMALL_SOURCE).unwrap();

    let journal = MemoryJournal::new();
    let err = Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(!report_path.exists());
}

#[test]
fn test_check_does_not_modify_source() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.json");
    let report_path = dir.path().join("duplicates.json");
    fs::write(&source, SMALL_SOURCE).unwrap();

    let journal = MemoryJournal::new();
    Checker::new(&journal)
        .check(&DEFAULT_UNIQUE_FIELDS, &source, &report_path)
        .unwrap();

    assert_eq!(fs::read_to_string(&source).unwrap(), SMALL_SOURCE);
}
