//! `VirtualTable`: the composition point of the engine.
//!
//! Wires the flattener, sticky offsets, windowed renderer and scroll sync
//! together around one [`TableConfig`]. Every input change triggers a
//! synchronous recomputation; each [`Frame`] is a fresh snapshot.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::TableConfig;
use crate::error::Result;
use crate::flatten::flatten;
use crate::layout::{
    column_offsets, compute_sticky_offsets, header_col_widths, StickyOffsets,
};
use crate::render::{RenderOutput, ScrollHandle, WindowedRenderer};
use crate::scroll_sync::{ScrollMetrics, ScrollSync, WheelOutcome};
use crate::types::{
    ColumnDescriptor, Direction, ExpandedKeys, FlatRow, PingState, Record, RowKey, ScrollConfig,
    ScrollEvent, ScrollSource,
};

/// Derives a row key from a record and its flat index.
pub type KeyFn<R> = Box<dyn Fn(&R, usize) -> RowKey>;

/// Row span of a column's cell in a record at a flat index.
pub type RowSpanFn<R> = Box<dyn Fn(&ColumnDescriptor, &R, usize) -> u32>;

/// Called once per column whose pixel width changed.
pub type ColumnResizeListener = Box<dyn FnMut(&str, f32)>;

/// Key of a JSON record: the `field` value, or the flat index when absent.
pub fn json_row_key(field: String) -> impl Fn(&Value, usize) -> RowKey {
    move |record, index| {
        record
            .get(&field)
            .and_then(RowKey::from_json)
            .unwrap_or_else(|| RowKey::from(index))
    }
}

/// Row span of a JSON record's cell, read from the column's `rowSpanField`.
pub fn json_row_span(column: &ColumnDescriptor, record: &Value, _index: usize) -> u32 {
    column
        .row_span_field
        .as_ref()
        .and_then(|field| record.get(field))
        .and_then(Value::as_u64)
        .map_or(1, |span| u32::try_from(span).unwrap_or(u32::MAX))
}

/// One recomputation pass: what the header and body paint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame<'a, R> {
    pub body: RenderOutput<'a, R>,
    /// Sticky offsets for body cells
    pub body_offsets: StickyOffsets,
    /// Sticky offsets for header cells, including the scrollbar column
    pub header_offsets: StickyOffsets,
    /// Header `<col>` widths; empty until every width is known
    pub header_col_widths: Vec<f32>,
    /// Cumulative right edge of every column
    pub columns_offset: Vec<f32>,
    pub scroll_left: f32,
    pub ping: PingState,
    pub horizontal_scrollbar_bottom: Option<f32>,
}

/// Outcome of [`VirtualTable::set_columns`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsUpdate {
    /// `(key, width)` of every column whose width changed
    pub resized: Vec<(String, f32)>,
    /// Broadcast needed when the narrower content clamped the scroll position
    pub scroll_event: Option<ScrollEvent>,
}

/// A virtualized table over records of type `R`.
pub struct VirtualTable<R> {
    config: TableConfig,
    records: Vec<R>,
    columns: Vec<ColumnDescriptor>,
    expanded: ExpandedKeys,
    key_of: KeyFn<R>,
    row_span: RowSpanFn<R>,
    renderer: WindowedRenderer,
    sync: ScrollSync,
    on_column_resize: Option<ColumnResizeListener>,
    duplicate_keys: Vec<RowKey>,
}

impl VirtualTable<Value> {
    /// Table over JSON records, keyed by `config.row_key`.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn json(config: TableConfig) -> Result<Self> {
        let key_of = json_row_key(config.row_key.clone());
        Self::new(config, key_of, json_row_span)
    }
}

impl<R: Record> VirtualTable<R> {
    /// Build a table.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new<K, S>(config: TableConfig, key_of: K, row_span: S) -> Result<Self>
    where
        K: Fn(&R, usize) -> RowKey + 'static,
        S: Fn(&ColumnDescriptor, &R, usize) -> u32 + 'static,
    {
        config.validate()?;
        let renderer = WindowedRenderer::new(&config);
        let sync = ScrollSync::new(config.direction);
        Ok(Self {
            config,
            records: Vec::new(),
            columns: Vec::new(),
            expanded: ExpandedKeys::new(),
            key_of: Box::new(key_of),
            row_span: Box::new(row_span),
            renderer,
            sync,
            on_column_resize: None,
            duplicate_keys: Vec::new(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn expanded_keys(&self) -> &ExpandedKeys {
        &self.expanded
    }

    pub fn renderer(&self) -> &WindowedRenderer {
        &self.renderer
    }

    /// Keys that occurred more than once in the last flattened sequence.
    pub fn duplicate_keys(&self) -> &[RowKey] {
        &self.duplicate_keys
    }

    pub fn set_column_resize_listener(&mut self, listener: impl FnMut(&str, f32) + 'static) {
        self.on_column_resize = Some(Box::new(listener));
    }

    /// Replace the records.
    pub fn set_data(&mut self, records: Vec<R>) {
        self.records = records;
        self.resync_rows();
    }

    /// Replace the expanded set.
    pub fn set_expanded_keys(&mut self, expanded: ExpandedKeys) {
        self.expanded = expanded;
        self.resync_rows();
    }

    /// Expand a collapsed row or collapse an expanded one. Returns the new state.
    pub fn toggle_expanded(&mut self, key: RowKey) -> bool {
        let expanded = if self.expanded.remove(&key) {
            false
        } else {
            self.expanded.insert(key);
            true
        };
        self.resync_rows();
        expanded
    }

    fn resync_rows(&mut self) {
        let rows = flatten(
            &self.records,
            &self.config.children_column_name,
            &self.expanded,
            &self.key_of,
        );
        self.duplicate_keys = self.renderer.sync_rows(&rows, &self.key_of);
    }

    /// The current flattened row sequence.
    pub fn rows(&self) -> Vec<FlatRow<'_, R>> {
        flatten(
            &self.records,
            &self.config.children_column_name,
            &self.expanded,
            &self.key_of,
        )
    }

    /// Replace the columns.
    ///
    /// Columns whose width changed (compared by key) are reported to the
    /// resize listener and returned. A narrower table may clamp the
    /// horizontal position; the resulting broadcast is returned as well.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>) -> ColumnsUpdate {
        let previous: HashMap<&str, Option<f32>> = self
            .columns
            .iter()
            .map(|c| (c.key.as_str(), c.usable_width()))
            .collect();
        let resized: Vec<(String, f32)> = columns
            .iter()
            .filter_map(|column| {
                let width = column.usable_width()?;
                let unchanged = previous
                    .get(column.key.as_str())
                    .copied()
                    .flatten()
                    .is_some_and(|old| (old - width).abs() <= f32::EPSILON);
                (!unchanged).then(|| (column.key.clone(), width))
            })
            .collect();

        self.columns = columns;
        let scroll_event = self.update_scroll_width();

        if let Some(listener) = self.on_column_resize.as_mut() {
            for (key, width) in &resized {
                listener(key, *width);
            }
        }
        ColumnsUpdate {
            resized,
            scroll_event,
        }
    }

    fn content_width(&self) -> Option<f32> {
        self.config.scroll_x.or_else(|| {
            self.columns
                .iter()
                .map(ColumnDescriptor::usable_width)
                .sum::<Option<f32>>()
        })
    }

    fn update_scroll_width(&mut self) -> Option<ScrollEvent> {
        let width = self.content_width();
        let list = self.renderer.list_mut();
        list.scroll_width = width;
        let viewport_width = list.viewport_width;
        let viewport_height = list.viewport_height;
        list.resize(viewport_width, viewport_height);
        self.reconcile_scroll_left()
    }

    /// Bring the shared position in line with the body after it was clamped.
    fn reconcile_scroll_left(&mut self) -> Option<ScrollEvent> {
        let body = self.renderer.scroll_left();
        if (body - self.sync.scroll_left()).abs() <= f32::EPSILON {
            return None;
        }
        tracing::debug!(
            from = self.sync.scroll_left(),
            to = body,
            "horizontal scroll clamped by layout change"
        );
        self.sync.on_scroll(ScrollSource::Body, body)
    }

    /// Change the text direction. Horizontal scroll resets to the origin and
    /// the reset is broadcast to the other surfaces.
    pub fn set_direction(&mut self, direction: Direction) -> Option<ScrollEvent> {
        self.config.direction = direction;
        self.sync.set_direction(direction);
        let list = self.renderer.list_mut();
        list.direction = direction;
        list.set_scroll_left(0.0);
        self.sync.on_scroll(ScrollSource::Body, 0.0)
    }

    /// Resize the body viewport. Returns the broadcast if the horizontal
    /// position had to be clamped.
    pub fn resize(&mut self, width: f32, height: f32) -> Option<ScrollEvent> {
        self.renderer.list_mut().resize(width, height);
        self.reconcile_scroll_left()
    }

    /// Record a measured row height.
    pub fn set_row_height(&mut self, key: &RowKey, height: f32) -> bool {
        self.renderer.set_row_height(key, height)
    }

    fn metrics(&self) -> ScrollMetrics {
        let list = self.renderer.list();
        ScrollMetrics {
            scroll_width: list.scroll_width.unwrap_or(list.viewport_width),
            client_width: list.viewport_width,
        }
    }

    /// Wheel over a surface with the table's own scroll geometry.
    pub fn on_wheel(&mut self, source: ScrollSource, delta_x: f32) -> WheelOutcome {
        let metrics = self.metrics();
        self.on_wheel_with_metrics(source, delta_x, metrics)
    }

    /// Wheel over a surface whose geometry the host measured.
    pub fn on_wheel_with_metrics(
        &mut self,
        source: ScrollSource,
        delta_x: f32,
        metrics: ScrollMetrics,
    ) -> WheelOutcome {
        let outcome = self.sync.on_wheel(source, delta_x, metrics);
        if let Some(next) = outcome.next_scroll_left {
            self.renderer.set_scroll_left(next);
        }
        outcome
    }

    /// A surface reported a new horizontal position (drag, keyboard, ...).
    ///
    /// The position is clamped to the body's range before it is shared, so
    /// every surface follows the same value.
    pub fn on_scroll(&mut self, source: ScrollSource, scroll_left: f32) -> Option<ScrollEvent> {
        if scroll_left.is_nan() {
            return None;
        }
        self.renderer.set_scroll_left(scroll_left);
        self.sync.on_scroll(source, self.renderer.scroll_left())
    }

    /// Set the horizontal position from the host API and broadcast it.
    pub fn set_scroll_left_event(&mut self, x: f32) -> Option<ScrollEvent> {
        if !self.renderer.set_scroll_left(x) {
            return None;
        }
        self.sync.on_scroll(ScrollSource::Body, self.renderer.scroll_left())
    }

    /// Compute the current frame.
    pub fn frame(&self) -> Frame<'_, R> {
        let rows = self.rows();
        let row_span = &self.row_span;
        let body = self.renderer.render(&rows, &self.columns, |column, row| {
            row_span(column, row.record, row.index)
        });

        let reservation = self.config.scrollbar_reservation();
        let body_offsets = compute_sticky_offsets(&self.columns, self.config.direction, 0.0);
        let header_offsets =
            compute_sticky_offsets(&self.columns, self.config.direction, reservation);
        let widths: Vec<Option<f32>> = self
            .columns
            .iter()
            .map(ColumnDescriptor::usable_width)
            .collect();

        let metrics = self.metrics();
        Frame {
            body,
            body_offsets,
            header_offsets,
            header_col_widths: header_col_widths(&widths, self.columns.len(), reservation),
            columns_offset: column_offsets(&self.columns),
            scroll_left: self.renderer.scroll_left(),
            ping: self
                .sync
                .ping_state(metrics.scroll_width, metrics.client_width),
            horizontal_scrollbar_bottom: self.config.horizontal_scrollbar_bottom(),
        }
    }
}

impl<R: Record> ScrollHandle for VirtualTable<R> {
    fn scroll_left(&self) -> f32 {
        self.renderer.scroll_left()
    }

    fn set_scroll_left(&mut self, x: f32) -> bool {
        self.set_scroll_left_event(x).is_some()
    }

    fn scroll_to(&mut self, config: &ScrollConfig) -> Option<f32> {
        self.renderer.scroll_to(config)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn table() -> VirtualTable<Value> {
        let config = TableConfig {
            item_height: 20.0,
            scroll_y: 100.0,
            ..TableConfig::default()
        };
        VirtualTable::json(config).unwrap()
    }

    #[test]
    fn test_toggle_expanded_reflattens() {
        let mut table = table();
        table.set_data(vec![
            json!({"key": 1, "children": [{"key": 2}, {"key": 3}]}),
            json!({"key": 4}),
        ]);
        assert_eq!(table.renderer().list().len(), 2);

        assert!(table.toggle_expanded(RowKey::from(1)));
        assert_eq!(table.renderer().list().len(), 4);
        assert_eq!(table.rows()[1].indent, 1);

        assert!(!table.toggle_expanded(RowKey::from(1)));
        assert_eq!(table.renderer().list().len(), 2);
    }

    #[test]
    fn test_column_resize_notifies_changed_columns_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut table = table();
        let sink = Rc::clone(&seen);
        table.set_column_resize_listener(move |key, width| {
            sink.borrow_mut().push((key.to_string(), width));
        });

        table.set_columns(vec![
            ColumnDescriptor::new("a", Some(100.0)),
            ColumnDescriptor::new("b", Some(50.0)),
        ]);
        assert_eq!(seen.borrow().len(), 2);

        let update = table.set_columns(vec![
            ColumnDescriptor::new("a", Some(100.0)),
            ColumnDescriptor::new("b", Some(80.0)),
        ]);
        assert_eq!(update.resized, vec![("b".to_string(), 80.0)]);
        assert_eq!(update.scroll_event, None);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_duplicate_keys_are_reported() {
        let mut table = table();
        table.set_data(vec![json!({"key": "x"}), json!({"key": "x"})]);
        assert_eq!(table.duplicate_keys(), &[RowKey::from("x")]);
        assert_eq!(table.renderer().list().index_of(&RowKey::from("x")), Some(1));
    }

    #[test]
    fn test_missing_key_falls_back_to_index() {
        let mut table = table();
        table.set_data(vec![json!({"name": "a"}), json!({"name": "b"})]);
        assert!(table.duplicate_keys().is_empty());
        assert_eq!(table.renderer().list().index_of(&RowKey::from(1usize)), Some(1));
    }
}
