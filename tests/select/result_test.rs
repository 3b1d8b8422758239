//! Select response parsing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use grnbind::select::{
    ColumnDescriptor, Coercions, FieldValue, ResultError, SelectCommand, SelectResult,
};
use serde_json::json;

const NO_KEYS: &[&str] = &[];

#[test]
fn test_records_round_trip() {
    let raw = r#"[[[2],[["count","Int"],["name","ShortText"]],[1,"a"],[2,"b"]]]"#;
    let result = SelectResult::parse(raw, NO_KEYS).unwrap();

    assert_eq!(result.n_hits, 2);
    assert_eq!(
        result.columns,
        vec![
            ColumnDescriptor::new("count", "Int"),
            ColumnDescriptor::new("name", "ShortText"),
        ]
    );

    let records = result.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("count").and_then(FieldValue::as_i64), Some(1));
    assert_eq!(records[0].get("name").and_then(FieldValue::as_str), Some("a"));
    assert_eq!(records[1].get("count").and_then(FieldValue::as_i64), Some(2));
    assert_eq!(records[1].get("name").and_then(FieldValue::as_str), Some("b"));

    let names: Vec<&str> = records[0].iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["count", "name"]);
}

#[test]
fn test_records_are_lazy_and_memoized() {
    let raw = r#"[[[1],[["_id","UInt32"]],[1]]]"#;
    let result = SelectResult::parse(raw, NO_KEYS).unwrap();

    assert!(!result.records_materialized());
    let first = result.records().as_ptr();
    assert!(result.records_materialized());
    assert_eq!(result.records().as_ptr(), first);
}

#[test]
fn test_time_column_coerced() {
    let raw = r#"[[[1],[["issued","Time"],["score","Float"]],[1234567890.5,1234567890.5]]]"#;
    let result = SelectResult::parse(raw, NO_KEYS).unwrap();
    let record = &result.records()[0];

    let expected = DateTime::<Utc>::from_timestamp(1_234_567_890, 500_000_000).unwrap();
    assert_eq!(
        record.get("issued").and_then(FieldValue::as_time),
        Some(expected)
    );
    assert_eq!(
        record.get("score").and_then(FieldValue::as_raw),
        Some(&json!(1234567890.5))
    );
}

#[test]
fn test_custom_coercions() {
    let raw = r#"[[[1],[["issued","Time"]],[1234567890]]]"#;
    let result = SelectResult::parse_with(raw, NO_KEYS, Arc::new(Coercions::empty())).unwrap();

    assert_eq!(
        result.records()[0].get("issued"),
        Some(&FieldValue::Raw(json!(1234567890)))
    );
}

#[test]
fn test_short_rows_filled_with_null() {
    let raw = r#"[[[1],[["_id","UInt32"],["title","ShortText"]],[1]]]"#;
    let result = SelectResult::parse(raw, NO_KEYS).unwrap();
    let record = &result.records()[0];

    assert_eq!(record.len(), 2);
    assert_eq!(record.get("title"), Some(&FieldValue::Raw(json!(null))));
}

#[test]
fn test_drill_down_association() {
    let raw = json!([
        [[3], [["_id", "UInt32"]], [1], [2], [3]],
        [[2], [["_key", "ShortText"], ["_nsubrecs", "Int32"]], ["news", 2], ["blog", 1]],
        [[1], [["_key", "ShortText"], ["_nsubrecs", "Int32"]], ["rust", 3]]
    ])
    .to_string();

    let result = SelectResult::parse(&raw, &["category", "tag"]).unwrap();
    assert_eq!(result.drill_down.len(), 2);
    assert_eq!(result.drill_down[0].0, "category");
    assert_eq!(result.drill_down[1].0, "tag");

    let category = result.drill_down("category").unwrap();
    assert_eq!(category.n_hits, 2);
    assert_eq!(
        category.records()[0].get("_key").and_then(FieldValue::as_str),
        Some("news")
    );

    let tag = result.drill_down("tag").unwrap();
    assert_eq!(tag.n_hits, 1);
    assert_eq!(
        tag.records()[0].get("_nsubrecs").and_then(FieldValue::as_i64),
        Some(3)
    );

    assert!(result.drill_down("author").is_none());
}

#[test]
fn test_drill_down_keys_from_command() {
    let command = SelectCommand::new("Entries").option("drill-down", "category tag");
    let raw = r#"[[[0]],[[0]],[[0]]]"#;
    let result = SelectResult::parse(raw, &command.drilldown_keys()).unwrap();

    let keys: Vec<&str> = result.drill_down.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["category", "tag"]);
}

#[test]
fn test_missing_drill_down_key() {
    let raw = r#"[[[0]],[[0]]]"#;
    assert!(matches!(
        SelectResult::parse(raw, NO_KEYS),
        Err(ResultError::MissingDrilldownKey { index: 0 })
    ));
}

#[test]
fn test_malformed_payloads() {
    assert!(matches!(
        SelectResult::parse("not json", NO_KEYS),
        Err(ResultError::Deserialize(_))
    ));
    assert!(matches!(
        SelectResult::parse(r#"{"n_hits": 1}"#, NO_KEYS),
        Err(ResultError::MalformedPayload(_))
    ));
    assert!(matches!(
        SelectResult::parse("[]", NO_KEYS),
        Err(ResultError::MalformedPayload(_))
    ));
}
