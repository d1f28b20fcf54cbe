//! `TableView` - the WASM-exported entry point for JavaScript hosts.
//!
//! Wraps a [`VirtualTable`] over JSON records:
//! - Records, columns and expanded keys arrive as plain JS values
//! - Each `frame()` returns the paint list and sticky offsets as a JS object
//! - Header wheel events are translated into synchronized scroll positions
//!
//! Nothing here throws for bad scroll requests; they are logged and ignored,
//! since hosts call them from fire-and-forget event handlers.

mod events;

use js_sys::Function;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::config::TableConfig;
use crate::render::ScrollHandle;
use crate::table::VirtualTable;
use crate::types::{
    ColumnDescriptor, Direction, ExpandedKeys, RowKey, ScrollConfig, ScrollSource,
};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize with plain objects instead of JS `Map`s.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

/// Virtualized table bound to a JavaScript host.
#[wasm_bindgen]
pub struct TableView {
    table: VirtualTable<Value>,
    on_scroll: Option<Function>,
    on_column_resize: Option<Function>,
}

#[wasm_bindgen]
impl TableView {
    /// Create a view. `config` may be `undefined` for defaults.
    ///
    /// # Errors
    /// Returns an error if the configuration is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TableView, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        let table = VirtualTable::json(config).map_err(to_js_error)?;
        Ok(Self {
            table,
            on_scroll: None,
            on_column_resize: None,
        })
    }

    /// Replace the records (an array of objects).
    ///
    /// # Errors
    /// Returns an error if `data` is not an array.
    pub fn set_data(&mut self, data: JsValue) -> Result<(), JsValue> {
        let records: Vec<Value> = serde_wasm_bindgen::from_value(data).map_err(to_js_error)?;
        self.table.set_data(records);
        Ok(())
    }

    /// Replace the columns. Returns the `[key, width]` pairs that changed.
    ///
    /// # Errors
    /// Returns an error if a column descriptor is malformed.
    pub fn set_columns(&mut self, columns: JsValue) -> Result<JsValue, JsValue> {
        let columns: Vec<ColumnDescriptor> =
            serde_wasm_bindgen::from_value(columns).map_err(to_js_error)?;
        let update = self.table.set_columns(columns);
        if let Some(callback) = &self.on_column_resize {
            for (key, width) in &update.resized {
                events::call_column_resize(callback, key, *width);
            }
        }
        if let Some(event) = &update.scroll_event {
            self.emit_scroll(event);
        }
        to_js(&update.resized)
    }

    /// Replace the expanded keys (an array of numbers/strings).
    ///
    /// # Errors
    /// Returns an error if a key is neither a number nor a string.
    pub fn set_expanded_keys(&mut self, keys: JsValue) -> Result<(), JsValue> {
        let keys: Vec<RowKey> = serde_wasm_bindgen::from_value(keys).map_err(to_js_error)?;
        self.table
            .set_expanded_keys(keys.into_iter().collect::<ExpandedKeys>());
        Ok(())
    }

    /// Toggle a row's expansion. Returns whether it is now expanded.
    ///
    /// # Errors
    /// Returns an error if `key` is neither a number nor a string.
    pub fn toggle_expanded(&mut self, key: JsValue) -> Result<bool, JsValue> {
        let key: RowKey = serde_wasm_bindgen::from_value(key).map_err(to_js_error)?;
        Ok(self.table.toggle_expanded(key))
    }

    /// Compute the current frame.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be converted to a JS value.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.frame())
    }

    /// Scroll vertically: `{ top }` or `{ index | key, offset?, align? }`.
    pub fn scroll_to(&mut self, config: JsValue) {
        match serde_wasm_bindgen::from_value::<ScrollConfig>(config) {
            Ok(config) => {
                self.table.scroll_to(&config);
            }
            Err(e) => tracing::warn!(error = %e, "ignoring malformed scroll config"),
        }
    }

    #[wasm_bindgen(getter = scrollLeft)]
    pub fn scroll_left(&self) -> f32 {
        ScrollHandle::scroll_left(&self.table)
    }

    #[wasm_bindgen(setter = scrollLeft)]
    pub fn set_scroll_left(&mut self, x: f32) {
        if let Some(event) = self.table.set_scroll_left_event(x) {
            self.emit_scroll(&event);
        }
    }

    /// Vertical scroll position of the body.
    #[wasm_bindgen(getter = scrollTop)]
    pub fn scroll_top(&self) -> f32 {
        self.table.renderer().list().scroll_top()
    }

    /// Resize the body viewport (logical pixels).
    pub fn resize(&mut self, width: f32, height: f32) {
        if let Some(event) = self.table.resize(width, height) {
            self.emit_scroll(&event);
        }
    }

    /// Switch between left-to-right and right-to-left layout.
    pub fn set_rtl(&mut self, rtl: bool) {
        let direction = if rtl { Direction::Rtl } else { Direction::Ltr };
        if let Some(event) = self.table.set_direction(direction) {
            self.emit_scroll(&event);
        }
    }

    /// Report a measured row height. Returns true if layout changed.
    pub fn set_row_height(&mut self, key: JsValue, height: f32) -> bool {
        serde_wasm_bindgen::from_value::<RowKey>(key)
            .is_ok_and(|key| self.table.set_row_height(&key, height))
    }

    /// Callback invoked with `{ scrollLeft, source, targets }`.
    pub fn set_on_scroll(&mut self, callback: Option<Function>) {
        self.on_scroll = callback;
    }

    /// Callback invoked with `(key, width)` for every resized column.
    pub fn set_on_column_resize(&mut self, callback: Option<Function>) {
        self.on_column_resize = callback;
    }

    /// The body scrolled horizontally (scrollbar drag, keyboard).
    pub fn on_body_scroll(&mut self, scroll_left: f32) {
        self.surface_scrolled(ScrollSource::Body, scroll_left);
    }

    /// The header scrolled horizontally.
    pub fn on_header_scroll(&mut self, scroll_left: f32) {
        self.surface_scrolled(ScrollSource::Header, scroll_left);
    }

    /// The summary row scrolled horizontally.
    pub fn on_summary_scroll(&mut self, scroll_left: f32) {
        self.surface_scrolled(ScrollSource::Summary, scroll_left);
    }
}

impl TableView {
    fn surface_scrolled(&mut self, source: ScrollSource, scroll_left: f32) {
        if let Some(event) = self.table.on_scroll(source, scroll_left) {
            self.emit_scroll(&event);
        }
    }

    /// The wrapped table.
    pub fn table(&self) -> &VirtualTable<Value> {
        &self.table
    }
}
