//! Virtual table integration tests
//!
//! End-to-end tests for the composed table: configuration parsing, expansion,
//! column changes, duplicate keys, and the serialized frame shape.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{col, end, expanded, leaf, node, numbered, row_keys, start, table, table_with};
use serde_json::{json, Value};
use vtable::render::ScrollHandle;
use vtable::{
    ColumnDescriptor, Direction, RowKey, ScrollConfig, TableConfig, VirtualTable, VtableError,
};

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_camel_case_json() {
    let config = TableConfig::from_json(
        r#"{
            "itemHeight": 32,
            "scrollY": 600,
            "scrollX": 2400,
            "direction": "rtl",
            "sticky": {"offsetHeader": 64, "offsetScroll": 8},
            "fixHeader": false,
            "childrenColumnName": "items",
            "rowKey": "id"
        }"#,
    )
    .unwrap();
    assert_eq!(config.item_height, 32.0);
    assert_eq!(config.scroll_x, Some(2400.0));
    assert_eq!(config.direction, Direction::Rtl);
    assert_eq!(config.scrollbar_reservation(), 0.0);
    assert_eq!(config.horizontal_scrollbar_bottom(), Some(8.0));
    assert_eq!(config.children_column_name, "items");
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = TableConfig::from_json(r#"{"itemHeight": 0}"#).unwrap_err();
    assert!(matches!(err, VtableError::InvalidConfig(_)));
    assert!(err.to_string().contains("itemHeight"));

    let err = TableConfig::from_json("not json").unwrap_err();
    assert!(matches!(err, VtableError::Json(_)));

    let config = TableConfig {
        children_column_name: String::new(),
        ..TableConfig::default()
    };
    assert!(VirtualTable::json(config).is_err());
}

#[test]
fn test_custom_key_and_children_fields() {
    let config = TableConfig {
        row_key: "id".to_string(),
        children_column_name: "items".to_string(),
        ..TableConfig::default()
    };
    let mut table = VirtualTable::json(config).unwrap();
    table.set_data(vec![json!({"id": "root", "items": [{"id": "leaf"}]})]);
    assert_eq!(table.rows().len(), 1);

    assert!(table.toggle_expanded(RowKey::from("root")));
    assert_eq!(table.rows().len(), 2);
    assert_eq!(
        table.renderer().list().index_of(&RowKey::from("leaf")),
        Some(1)
    );
}

// ============================================================================
// Data and expansion
// ============================================================================

#[test]
fn test_expansion_changes_window() {
    let mut table = table_with(
        20.0,
        60.0,
        vec![col("a", 100.0)],
        vec![node(1, vec![leaf(10), leaf(11), leaf(12)]), leaf(2), leaf(3)],
    );
    assert_eq!(table.frame().body.visible_indices(), vec![0, 1, 2]);

    table.set_expanded_keys(expanded(&[1]));
    assert_eq!(row_keys(&table.rows()), vec![1, 10, 11, 12, 2, 3]);
    let frame = table.frame();
    let keys: Vec<RowKey> = frame.body.visible_rows.iter().map(|r| r.key.clone()).collect();
    assert_eq!(keys, vec![RowKey::from(1), RowKey::from(10), RowKey::from(11)]);
    assert_eq!(frame.body.visible_rows[1].row.indent, 1);
    assert_eq!(frame.body.total_height, 120.0);
}

#[test]
fn test_collapse_clamps_scroll() {
    let mut table = table_with(
        20.0,
        40.0,
        vec![col("a", 100.0)],
        vec![node(1, (10..30).map(leaf).collect()), leaf(2)],
    );
    table.set_expanded_keys(expanded(&[1]));
    table.scroll_to(&ScrollConfig::top(300.0));
    assert_eq!(table.renderer().list().scroll_top(), 300.0);

    table.toggle_expanded(RowKey::from(1));
    assert_eq!(table.renderer().list().scroll_top(), 0.0);
    assert_eq!(table.frame().body.visible_indices(), vec![0, 1]);
}

#[test]
fn test_duplicate_keys_keep_last_mapping() {
    let mut table = table(20.0, 100.0);
    table.set_data(vec![leaf(1), leaf(2), leaf(1)]);
    assert_eq!(table.duplicate_keys(), &[RowKey::from(1)]);
    assert_eq!(table.scroll_to(&ScrollConfig::key(1).with_offset(0.0)), Some(0.0));
    assert_eq!(table.renderer().list().index_of(&RowKey::from(1)), Some(2));
}

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_resize_listener_reports_changed_widths() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut table = table(20.0, 100.0);
    table.set_column_resize_listener(move |key, width| {
        sink.borrow_mut().push((key.to_string(), width));
    });

    table.set_columns(vec![col("a", 100.0), ColumnDescriptor::new("b", None)]);
    assert_eq!(*seen.borrow(), vec![("a".to_string(), 100.0)]);

    table.set_columns(vec![col("a", 100.0), col("b", 40.0)]);
    assert_eq!(seen.borrow().last(), Some(&("b".to_string(), 40.0)));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_columns_offset_is_cumulative() {
    let mut table = table(20.0, 100.0);
    table.set_columns(vec![start("a", 50.0), col("b", 70.0), end("c", 30.0)]);
    assert_eq!(table.frame().columns_offset, vec![50.0, 120.0, 150.0]);
}

// ============================================================================
// Frame
// ============================================================================

#[test]
fn test_frame_serializes_camel_case() {
    let mut table = table_with(
        20.0,
        40.0,
        vec![start("a", 50.0), col("b", 70.0)],
        numbered(5),
    );
    table.resize(400.0, 40.0);
    table.scroll_to(&ScrollConfig::top(20.0));

    let value: Value = serde_json::to_value(table.frame()).unwrap();
    assert_eq!(value["body"]["offsetY"], json!(20.0));
    assert_eq!(value["body"]["visibleRows"][0]["row"]["index"], json!(1));
    assert_eq!(value["body"]["visibleRows"][0]["row"]["record"]["key"], json!(1));
    assert_eq!(value["body"]["visibleRows"][0]["key"], json!(1));
    assert_eq!(value["bodyOffsets"]["start"], json!([0.0]));
    assert_eq!(value["bodyOffsets"]["mode"], json!("fixed"));
    assert_eq!(value["headerColWidths"], json!([50.0, 70.0, 15.0]));
    assert_eq!(value["ping"], json!({"start": false, "end": false}));
    assert!(value["horizontalScrollbarBottom"].is_null());
}

#[test]
fn test_identical_inputs_identical_frames() {
    let build = || {
        let mut table = table_with(
            20.0,
            100.0,
            vec![start("a", 50.0), col("b", 70.0), end("c", 30.0)],
            numbered(50),
        );
        table.scroll_to(&ScrollConfig::top(333.0));
        serde_json::to_string(&table.frame()).unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn test_empty_table_frame() {
    let table = table(20.0, 100.0);
    let frame = table.frame();
    assert!(frame.body.visible_rows.is_empty());
    assert!(frame.body.extra_span_rows.is_empty());
    assert_eq!(frame.body.total_height, 0.0);
    assert!(frame.body_offsets.start.is_empty());
}
