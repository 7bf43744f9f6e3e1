//! Expands records with nested sub-collections into display rows.
//!
//! Sibling nested collections are aligned by position only: row `i` pairs
//! inventor `i` with application `i` purely because both sit at index `i`,
//! not because the API relates them. Rows must be read per column, never as
//! a joined fact across nested fields.

use serde_json::{Map, Value};

use crate::response::{QueryResult, Record};

/// One flattened row: every scalar field of the record, plus each nested
/// field reduced to a single element (or null) for this row.
pub type FlatRow = Map<String, Value>;

/// A nested collection is a field holding a sequence of mappings. An array
/// of scalars (e.g. a list of ids) is not one; it rides along unchanged.
fn is_nested(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(Value::is_object),
        _ => false,
    }
}

/// Expand one record into rows, one per element of its largest nested
/// collection. Shorter collections pad with null; a record with no nested
/// collections (or only empty ones) yields exactly one row.
pub fn flatten_record(record: &Record) -> Vec<FlatRow> {
    let widest = record
        .iter()
        .filter(|(_, value)| is_nested(value))
        .filter_map(|(_, value)| value.as_array().map(Vec::len))
        .max();

    let rows = match widest {
        None => return vec![record.clone()],
        Some(len) => len.max(1),
    };

    (0..rows)
        .map(|i| {
            record
                .iter()
                .map(|(name, value)| {
                    let cell = if is_nested(value) {
                        value
                            .as_array()
                            .and_then(|items| items.get(i))
                            .cloned()
                            .unwrap_or(Value::Null)
                    } else {
                        value.clone()
                    };
                    (name.clone(), cell)
                })
                .collect()
        })
        .collect()
}

pub fn flatten(result: &QueryResult) -> Vec<FlatRow> {
    result.records.iter().flat_map(flatten_record).collect()
}

#[test]
fn test_flatten_scalar_record_is_identity() {
    let record: Record = serde_json::from_str(
        r#"{"patent_id": "10000001", "patent_title": "Adaptive control of a valve"}"#,
    )
    .unwrap();

    let rows = flatten_record(&record);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], record);
}

#[test]
fn test_flatten_pads_shorter_collection_with_null() {
    let record: Record = serde_json::from_str(
        r#"{
            "patent_id": "10000001",
            "inventors": [
                {"inventor_last_name": "Marron"},
                {"inventor_last_name": "Yuan"}
            ],
            "applications": [
                {"app_id": "15/599,107"},
                {"app_id": "15/599,108"},
                {"app_id": "15/599,109"}
            ]
        }"#,
    )
    .unwrap();

    let rows = flatten_record(&record);
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row["patent_id"], Value::from("10000001"));
    }
    assert_eq!(
        rows[1]["inventors"],
        serde_json::json!({"inventor_last_name": "Yuan"})
    );
    assert_eq!(rows[2]["inventors"], Value::Null);
    assert_eq!(rows[2]["applications"], serde_json::json!({"app_id": "15/599,109"}));
}

#[test]
fn test_flatten_all_empty_collections_keep_one_row() {
    let record: Record =
        serde_json::from_str(r#"{"patent_id": "10000001", "inventors": []}"#).unwrap();

    let rows = flatten_record(&record);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["patent_id"], Value::from("10000001"));
    assert_eq!(rows[0]["inventors"], Value::Null);
}
