use serde_json::{Value, json};

use gleaner::flatten::{flatten, flatten_record};
use gleaner::response::{QueryResult, Record};

fn record(value: Value) -> Record {
    value.as_object().cloned().expect("test record must be an object")
}

#[test]
fn test_record_without_nested_collections_is_one_row() {
    let rec = record(json!({
        "patent_id": "10000001",
        "patent_title": "Coherent LADAR using intra-pixel quadrature detection",
        "patent_date": "2018-06-19",
    }));

    let rows = flatten_record(&rec);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], rec);
}

#[test]
fn test_row_count_equals_largest_nested_collection() {
    let rec = record(json!({
        "patent_id": "10000001",
        "inventors": [
            {"inventor_last_name": "Marron"},
            {"inventor_last_name": "Yuan"},
        ],
        "applications": [
            {"app_id": "15/599,107"},
            {"app_id": "15/599,108"},
            {"app_id": "15/599,109"},
        ],
    }));

    let rows = flatten_record(&rec);
    assert_eq!(rows.len(), 3);

    for row in &rows {
        assert_eq!(row["patent_id"], json!("10000001"));
    }

    // the shorter collection runs out after two rows
    assert_eq!(rows[0]["inventors"], json!({"inventor_last_name": "Marron"}));
    assert_eq!(rows[1]["inventors"], json!({"inventor_last_name": "Yuan"}));
    assert_eq!(rows[2]["inventors"], Value::Null);
    assert_eq!(rows[2]["applications"], json!({"app_id": "15/599,109"}));
}

#[test]
fn test_scalar_arrays_are_not_nested_collections() {
    let rec = record(json!({
        "patent_id": "10000001",
        "cited_patent_ids": ["9000001", "9000002", "9000003"],
        "inventors": [{"inventor_last_name": "Marron"}],
    }));

    let rows = flatten_record(&rec);
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["cited_patent_ids"],
        json!(["9000001", "9000002", "9000003"])
    );
}

#[test]
fn test_empty_nested_collections_keep_the_record() {
    let rec = record(json!({
        "patent_id": "10000001",
        "inventors": [],
        "applications": [],
    }));

    let rows = flatten_record(&rec);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["patent_id"], json!("10000001"));
    assert_eq!(rows[0]["inventors"], Value::Null);
    assert_eq!(rows[0]["applications"], Value::Null);
}

#[test]
fn test_flatten_concatenates_per_record_rows() {
    let result = QueryResult {
        records: vec![
            record(json!({
                "patent_id": "10000001",
                "inventors": [
                    {"inventor_last_name": "Marron"},
                    {"inventor_last_name": "Yuan"},
                ],
            })),
            record(json!({"patent_id": "10000002"})),
        ],
        count: 2,
        total: 2,
    };

    let rows = flatten(&result);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["patent_id"], json!("10000001"));
    assert_eq!(rows[1]["patent_id"], json!("10000001"));
    assert_eq!(rows[2]["patent_id"], json!("10000002"));
}
