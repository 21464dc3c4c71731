//! Integration tests for the Record derive macro.
//!
//! These tests verify that `#[derive(Record)]` generates field constants,
//! named field access and map conversion usable from query key selectors.

#![allow(dead_code)] // Some fields are intentionally skipped for testing

use seqwise::{field, Record, Timestamp, ToValue, Value};
use seqwise_macros::Record as DeriveRecord;

// =============================================================================
// Basic derive tests
// =============================================================================

#[derive(Debug, Clone, DeriveRecord)]
struct Task {
    name: String,
    priority: u8,
    done: bool,
}

fn task(name: &str, priority: u8, done: bool) -> Task {
    Task {
        name: name.to_string(),
        priority,
        done,
    }
}

#[test]
fn test_field_constants() {
    assert_eq!(Task::NAME, "name");
    assert_eq!(Task::PRIORITY, "priority");
    assert_eq!(Task::DONE, "done");
}

#[test]
fn test_field_value() {
    let t = task("Write docs", 3, false);
    assert_eq!(t.field_value("name"), Value::from("Write docs"));
    assert_eq!(t.field_value(Task::PRIORITY), Value::from(3u8));
    assert_eq!(t.field_value("done"), Value::Bool(false));
    assert_eq!(t.field_value("missing"), Value::Null);
}

#[test]
fn test_to_value_keeps_declaration_order() {
    let value = task("a", 1, true).to_value();
    let Value::Map(entries) = &value else {
        panic!("expected a map, got {value:?}");
    };
    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["name", "priority", "done"]);
    assert_eq!(value.get("priority"), Some(&Value::from(1u8)));
}

// =============================================================================
// Attributes
// =============================================================================

#[derive(Clone, DeriveRecord)]
struct Entry {
    #[record(rename = "file_name")]
    name: String,

    #[record(skip)]
    handle: u64,

    modified: Timestamp,

    tags: Vec<String>,

    parent: Option<String>,
}

fn entry(name: &str, modified: i64) -> Entry {
    Entry {
        name: name.to_string(),
        handle: 42,
        modified: Timestamp(modified),
        tags: vec!["a".to_string()],
        parent: None,
    }
}

#[test]
fn test_rename() {
    let e = entry("notes.txt", 0);
    assert_eq!(Entry::FILE_NAME, "file_name");
    assert_eq!(e.field_value("file_name"), Value::from("notes.txt"));
    assert_eq!(e.field_value("name"), Value::Null);
}

#[test]
fn test_skip() {
    let e = entry("notes.txt", 0);
    assert_eq!(e.field_value("handle"), Value::Null);
    assert!(e.to_value().get("handle").is_none());
}

#[test]
fn test_nested_and_optional_fields() {
    let e = entry("notes.txt", 5);
    assert_eq!(e.field_value("modified"), Value::Timestamp(Timestamp(5)));
    assert_eq!(e.field_value("tags"), Value::from(vec!["a"]));
    assert_eq!(e.field_value("parent"), Value::Null);
}

// =============================================================================
// Use in queries
// =============================================================================

#[test]
fn test_order_by_named_field() {
    let tasks = vec![task("b", 2, false), task("a", 5, true), task("c", 1, false)];

    let names: Vec<String> = seqwise::from(tasks)
        .order_by_descending(field(Task::PRIORITY))
        .select(|t| t.name)
        .to_vec()
        .unwrap();

    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_group_and_filter_by_named_field() {
    let tasks = vec![task("b", 2, false), task("a", 5, true), task("c", 2, false)];
    let query = seqwise::from(tasks);

    let done = query.clone().filter(field(Task::DONE)).count().unwrap();
    assert_eq!(done, 1);

    let groups = query.clone().group_by(field(Task::PRIORITY)).to_vec().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key(), &Value::from(2u8));
    assert_eq!(groups[0].len(), 2);

    // Booleans have no order, so they cannot be group keys
    assert!(query.group_by(field(Task::DONE)).to_vec().is_err());
}

#[test]
fn test_order_by_timestamp_field() {
    let entries = vec![entry("new", 300), entry("old", 100), entry("mid", 200)];

    let newest = seqwise::from(entries)
        .order_by_descending(field(Entry::MODIFIED))
        .first()
        .unwrap();

    assert_eq!(newest.name, "new");
}
