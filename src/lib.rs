//! vtable - virtualized table layout for the web
//!
//! Computes what a large, tree-shaped table paints and where, via WebAssembly:
//! - Tree records flattened by expansion state, with indentation
//! - Windowed body rows with overlay rows for row-spanning cells
//! - Sticky offsets for fixed columns, in LTR and RTL
//! - Horizontal scroll synchronized across header, body and summary
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableView } from 'vtable';
//! await init();
//! const view = new TableView({ scrollY: 400, itemHeight: 24 });
//! view.set_columns(columns);
//! view.set_data(records);
//! const frame = view.frame();
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod types;

// Layout and rendering
pub mod layout;
pub mod render;
pub mod scroll_sync;
pub mod table;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::TableConfig;
pub use error::VtableError;
pub use table::{ColumnsUpdate, Frame, VirtualTable};
pub use viewer::TableView;

pub use types::*;

/// Sticky offsets for a set of columns, as a JSON string.
///
/// # Arguments
/// * `columns` - JSON array of column descriptors
/// * `rtl` - whether the table is laid out right-to-left
/// * `scrollbar` - width reserved after the last column (0 for body cells)
///
/// # Errors
/// Returns an error if `columns` is not a valid column array.
#[wasm_bindgen]
pub fn sticky_offsets(columns: &str, rtl: bool, scrollbar: f32) -> Result<String, JsValue> {
    let columns: Vec<ColumnDescriptor> =
        serde_json::from_str(columns).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let direction = if rtl { Direction::Rtl } else { Direction::Ltr };
    let offsets = layout::compute_sticky_offsets(&columns, direction, scrollbar);

    serde_json::to_string(&offsets)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Flatten a JSON record tree and return the rows as JSON.
///
/// Each row is `{ record, indent, index }`. Keys are read from `rowKey`
/// (falling back to the flat index); children from `childrenKey`.
///
/// # Errors
/// Returns an error if `records` or `expanded_keys` is not a JSON array.
#[wasm_bindgen]
pub fn flatten_records(
    records: &str,
    expanded_keys: &str,
    children_key: &str,
    row_key: &str,
) -> Result<String, JsValue> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(records).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let expanded: ExpandedKeys = serde_json::from_str::<Vec<RowKey>>(expanded_keys)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .into_iter()
        .collect();
    let key_of = table::json_row_key(row_key.to_string());
    let rows = flatten::flatten(&records, children_key, &expanded, key_of);

    serde_json::to_string(&rows)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
