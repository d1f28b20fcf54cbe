//! Common test utilities: record builders and table constructors.
//!
//! Records are plain JSON objects keyed by `"key"` with children under
//! `"children"`, matching the default `TableConfig`.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use serde_json::{json, Value};
use vtable::{
    ColumnDescriptor, ExpandedKeys, FixedSide, FlatRow, RowKey, TableConfig, VirtualTable,
};

// ============================================================================
// Records
// ============================================================================

/// A record without children.
pub fn leaf(key: i64) -> Value {
    json!({ "key": key })
}

/// A record with children.
pub fn node(key: i64, children: Vec<Value>) -> Value {
    json!({ "key": key, "children": children })
}

/// `count` flat records keyed `0..count`.
pub fn numbered(count: usize) -> Vec<Value> {
    (0..count as i64).map(leaf).collect()
}

/// `count` flat records where `owner` spans `span` rows in the `"span"` field.
///
/// Rows covered by the span carry `span: 0`; all others carry no span field.
pub fn spanned(count: usize, owner: usize, span: u32) -> Vec<Value> {
    let covered_end = owner + span as usize;
    (0..count)
        .map(|i| {
            let mut record = leaf(i as i64);
            if i == owner {
                record["span"] = json!(span);
            } else if i > owner && i < covered_end {
                record["span"] = json!(0);
            }
            record
        })
        .collect()
}

/// Expanded set from numeric keys.
pub fn expanded(keys: &[i64]) -> ExpandedKeys {
    keys.iter().copied().map(RowKey::from).collect()
}

/// The `"key"` of every flattened row.
pub fn row_keys(rows: &[FlatRow<'_, Value>]) -> Vec<i64> {
    rows.iter()
        .map(|row| row.record["key"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Columns
// ============================================================================

pub fn col(key: &str, width: f32) -> ColumnDescriptor {
    ColumnDescriptor::new(key, Some(width))
}

pub fn start(key: &str, width: f32) -> ColumnDescriptor {
    col(key, width).fixed(FixedSide::Start)
}

pub fn end(key: &str, width: f32) -> ColumnDescriptor {
    col(key, width).fixed(FixedSide::End)
}

/// A column whose cells span rows according to the `"span"` field.
pub fn span_col(key: &str, width: f32) -> ColumnDescriptor {
    col(key, width).with_row_span_field("span")
}

// ============================================================================
// Tables
// ============================================================================

pub fn config(item_height: f32, viewport_height: f32) -> TableConfig {
    TableConfig {
        item_height,
        scroll_y: viewport_height,
        ..TableConfig::default()
    }
}

/// A JSON table with the given row height and viewport height.
pub fn table(item_height: f32, viewport_height: f32) -> VirtualTable<Value> {
    VirtualTable::json(config(item_height, viewport_height)).expect("valid config")
}

/// A JSON table already holding `records`.
pub fn table_with(
    item_height: f32,
    viewport_height: f32,
    columns: Vec<ColumnDescriptor>,
    records: Vec<Value>,
) -> VirtualTable<Value> {
    let mut table = table(item_height, viewport_height);
    table.set_columns(columns);
    table.set_data(records);
    table
}
