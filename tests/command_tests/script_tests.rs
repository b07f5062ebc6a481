//! Tests for command parsing and ScriptRunner
//!
//! These tests verify:
//! - Parsing of every command form
//! - Canonical formatting (audit descriptions)
//! - Script output for hits and misses under both policies
//! - Run summaries and skipped lines

use tempfile::TempDir;
use typestore::audit::{AuditOutcome, FileAuditLog};
use typestore::command::{Command, RunSummary, ScriptRunner};
use typestore::{Config, RecordStore, SearchMissPolicy, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_writes(false)
        .build();
    let audit = FileAuditLog::open(&config.audit_log_path()).unwrap();
    let store = RecordStore::open(config, Box::new(audit)).unwrap();
    (temp_dir, store)
}

fn run_script(store: &RecordStore, script: &str, policy: SearchMissPolicy) -> (String, RunSummary) {
    let mut runner = ScriptRunner::new(store, Vec::new(), policy);
    let summary = runner.run(script.as_bytes()).unwrap();
    (String::from_utf8(runner.into_output()).unwrap(), summary)
}

const SCENARIO: &str = "\
create type char 3 1 name house age
create record char Jon Stark 16
create record char Jon Stark 17
search record char Jon
delete record char Jon
search record char Jon
";

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_create_type() {
    let command = Command::parse("create type char 3 1 name house age").unwrap();

    assert_eq!(
        command,
        Command::CreateType {
            name: "char".to_string(),
            field_count: 3,
            primary_key_ordinal: 1,
            fields: vec!["name".into(), "house".into(), "age".into()],
        }
    );
    assert_eq!(command.type_name(), "char");
}

#[test]
fn test_parse_record_commands() {
    assert_eq!(
        Command::parse("create record char Jon Stark 16").unwrap(),
        Command::CreateRecord {
            type_name: "char".to_string(),
            values: vec!["Jon".into(), "Stark".into(), "16".into()],
        }
    );
    assert_eq!(
        Command::parse("  delete   record char Jon ").unwrap(),
        Command::DeleteRecord {
            type_name: "char".to_string(),
            key: "Jon".to_string(),
        }
    );
    assert_eq!(
        Command::parse("search record char Jon").unwrap(),
        Command::SearchRecord {
            type_name: "char".to_string(),
            key: "Jon".to_string(),
        }
    );
}

#[test]
fn test_parse_errors() {
    for line in [
        "drop type char",
        "create type char x 1 name",
        "create type char 3",
        "search record char",
        "delete record char Jon extra",
        "",
    ] {
        assert!(
            matches!(Command::parse(line), Err(StoreError::Parse(_))),
            "expected parse error for {:?}",
            line
        );
    }
}

#[test]
fn test_display_is_canonical() {
    let line = "create type char 3 1 name house age";
    assert_eq!(Command::parse(line).unwrap().to_string(), line);

    let messy = Command::parse("create   record char  Jon Stark\t16").unwrap();
    assert_eq!(messy.to_string(), "create record char Jon Stark 16");
}

// =============================================================================
// Runner Tests
// =============================================================================

#[test]
fn test_scenario_with_placeholder() {
    let (_temp, store) = setup_store();

    let (output, summary) = run_script(&store, SCENARIO, SearchMissPolicy::default());

    assert_eq!(output, "Jon Stark 16\nRecord not found\n");
    assert_eq!(
        summary,
        RunSummary {
            executed: 6,
            succeeded: 4,
            failed: 2,
            skipped: 0,
        }
    );
}

#[test]
fn test_scenario_silent_misses() {
    let (_temp, store) = setup_store();

    let (output, _) = run_script(&store, SCENARIO, SearchMissPolicy::Silent);

    assert_eq!(output, "Jon Stark 16\n");
}

#[test]
fn test_custom_placeholder() {
    let (_temp, store) = setup_store();
    let script = "create type t 1 1 a\nsearch record t nothing\nsearch record ghost x\n";

    let (output, _) = run_script(&store, script, SearchMissPolicy::Placeholder("-".to_string()));

    assert_eq!(output, "-\n-\n");
}

#[test]
fn test_bad_lines_are_skipped() {
    let (_temp, store) = setup_store();
    let script = "create type t 1 1 a\n\nthis is not a command\ncreate record t x\nsearch record t x\n";

    let (output, summary) = run_script(&store, script, SearchMissPolicy::default());

    assert_eq!(output, "x\n");
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.executed, 3);
    assert_eq!(summary.failed, 0);
}

#[test]
fn test_script_leaves_audit_trail() {
    let (_temp, store) = setup_store();
    run_script(&store, SCENARIO, SearchMissPolicy::default());

    let log = FileAuditLog::open(&store.config().audit_log_path()).unwrap();
    let entries = log.entries().unwrap();

    assert_eq!(entries.len(), 6);
    assert_eq!(entries[2].operation, "create record char Jon Stark 17");
}

#[test]
fn test_unparsed_lines_are_audited() {
    let (_temp, store) = setup_store();
    let script = "create type char 3 1 name house age\ndelete record char a b\n";

    let (_, summary) = run_script(&store, script, SearchMissPolicy::default());

    let log = FileAuditLog::open(&store.config().audit_log_path()).unwrap();
    let entries = log.entries().unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].operation, "delete record char a b");
    assert_eq!(entries[1].outcome, AuditOutcome::Failure);
}
