//! Scenario tests for the jobs parser through the public parser contract.

use cmdjson::parsers::{History, JobsParser};
use cmdjson::{ParseError, ParseOptions, Parser};
use serde_json::json;

fn parse(data: &str) -> Vec<serde_json::Value> {
    JobsParser.parse(data, ParseOptions::default()).unwrap()
}

const LONG_LISTING: &str = "\
[1]   14798 Running     sleep 10000 &
[2]   14799 Running     sleep 10001 &
[3]   14800 Running     sleep 10002 &
[4]-  14814 Running     sleep 10003 &
[5]+  14815 Running     sleep 10004 &
";

#[test]
fn test_plain_running_job() {
    assert_eq!(
        parse("[1]   Running     sleep 10000 &"),
        vec![json!({"job_number": 1, "status": "Running", "command": "sleep 10000 &"})]
    );
}

#[test]
fn test_previous_job_long_format() {
    assert_eq!(
        parse("[4]-  14814 Running     sleep 10003 &"),
        vec![json!({
            "job_number": 4,
            "pid": 14814,
            "history": "previous",
            "status": "Running",
            "command": "sleep 10003 &"
        })]
    );
}

#[test]
fn test_current_job_long_format() {
    assert_eq!(
        parse("[5]+  14815 Running     sleep 10004 &"),
        vec![json!({
            "job_number": 5,
            "pid": 14815,
            "history": "current",
            "status": "Running",
            "command": "sleep 10004 &"
        })]
    );
}

#[test]
fn test_full_listing_keeps_line_order() {
    let records = parse(LONG_LISTING);
    let numbers: Vec<_> = records.iter().map(|r| r["job_number"].clone()).collect();
    assert_eq!(numbers, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    assert!(records[0].get("history").is_none());
}

#[test]
fn test_non_numeric_job_number_is_fatal() {
    let data = "[1]   Running     sleep 10000 &\n[one] Running     sleep 10001 &\n";
    let err = JobsParser.parse(data, ParseOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::InvalidInteger { field: "job number", .. }));
}

#[test]
fn test_raw_mode_fails_the_same_way() {
    let data = "[one] Running     sleep 10001 &";
    assert!(JobsParser.parse(data, ParseOptions::new(true, true)).is_err());
}

#[test]
fn test_reparsing_a_line_is_stable() {
    for line in LONG_LISTING.lines() {
        let first = parse(line);
        let second = parse(line);
        assert_eq!(first, second);
        assert_eq!(first, vec![parse(LONG_LISTING)
            .into_iter()
            .find(|r| r["command"] == first[0]["command"])
            .unwrap()]);
    }
}

#[test]
fn test_field_order_with_optional_fields() {
    let cases = [
        ("[1]   Running     sleep 1 &", vec!["job_number", "status", "command"]),
        ("[1]+  Running     sleep 1 &", vec!["job_number", "history", "status", "command"]),
        ("[1]   77 Running     sleep 1 &", vec!["job_number", "pid", "status", "command"]),
        (
            "[1]-  77 Running     sleep 1 &",
            vec!["job_number", "pid", "history", "status", "command"],
        ),
    ];
    for (line, expected) in cases {
        let records = parse(line);
        let keys: Vec<_> = records[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, expected, "field order for {line:?}");
    }
}

#[test]
fn test_typed_entries() {
    let entries = JobsParser.entries(LONG_LISTING).unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[3].history, Some(History::Previous));
    assert_eq!(entries[4].history, Some(History::Current));
    assert_eq!(entries[4].pid, Some(14815));
}

#[test]
fn test_command_keeps_trailing_markers() {
    let records = parse("[2]   Stopped     vim  'a b'  &  ");
    assert_eq!(records[0]["command"], "vim  'a b'  &  ");
}
