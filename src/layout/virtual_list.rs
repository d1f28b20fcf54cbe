//! The windowing primitive: row geometry and scroll state for a virtual list.
//!
//! Row positions are pre-computed as cumulative heights so that position
//! lookups are O(1) and hit testing is O(log n). Rows are identified by
//! [`RowKey`]; measured heights follow their key when the row sequence changes.

use std::collections::{HashMap, HashSet};

use crate::types::{Direction, RowKey, ScrollAlign, SizeInfo};

/// Default row height in pixels.
pub const DEFAULT_ITEM_HEIGHT: f32 = 24.0;

/// Geometry and scroll state of a vertically virtualized list.
#[derive(Debug, Clone)]
pub struct VirtualList {
    /// Height used for rows that have not been measured
    item_height: f32,
    keys: Vec<RowKey>,
    /// Key -> index, last occurrence wins
    index: HashMap<RowKey, usize>,
    /// Heights reported by the host, by key
    measured: HashMap<RowKey, f32>,
    /// Cumulative row positions (`positions[i]` = y of row i's top edge)
    positions: Vec<f32>,
    /// Vertical scroll position in content coordinates
    scroll_top: f32,
    /// Horizontal scroll position (non-positive in rtl)
    scroll_left: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Content width; `None` when content never overflows horizontally
    pub scroll_width: Option<f32>,
    pub direction: Direction,
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_HEIGHT, 0.0)
    }
}

impl VirtualList {
    /// Create an empty list.
    pub fn new(item_height: f32, viewport_height: f32) -> Self {
        let item_height = if item_height.is_finite() && item_height > 0.0 {
            item_height
        } else {
            DEFAULT_ITEM_HEIGHT
        };
        Self {
            item_height,
            keys: Vec::new(),
            index: HashMap::new(),
            measured: HashMap::new(),
            positions: vec![0.0],
            scroll_top: 0.0,
            scroll_left: 0.0,
            viewport_height: viewport_height.max(0.0),
            viewport_width: 0.0,
            scroll_width: None,
            direction: Direction::Ltr,
        }
    }

    /// Replace the row sequence.
    ///
    /// Measured heights of keys that survive are kept. Returns the keys that
    /// occur more than once; lookups for those resolve to the last occurrence.
    pub fn set_keys(&mut self, keys: Vec<RowKey>) -> Vec<RowKey> {
        let mut index = HashMap::with_capacity(keys.len());
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            if index.insert(key.clone(), i).is_some() && reported.insert(key) {
                duplicates.push(key.clone());
            }
        }
        self.measured.retain(|key, _| index.contains_key(key));
        self.index = index;
        self.keys = keys;
        self.rebuild_positions();
        self.set_scroll_top(self.scroll_top);
        duplicates
    }

    /// Current keys in row order.
    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    /// Record the rendered height of a row. Returns true if layout changed.
    pub fn set_item_height(&mut self, key: &RowKey, height: f32) -> bool {
        if !self.index.contains_key(key) || !height.is_finite() || height < 0.0 {
            return false;
        }
        let previous = self.measured.insert(key.clone(), height);
        if previous.is_some_and(|h| (h - height).abs() <= f32::EPSILON) {
            return false;
        }
        self.rebuild_positions();
        true
    }

    fn rebuild_positions(&mut self) {
        let mut positions = Vec::with_capacity(self.keys.len() + 1);
        let mut y: f32 = 0.0;
        for key in &self.keys {
            positions.push(y);
            y += self.measured.get(key).copied().unwrap_or(self.item_height);
        }
        positions.push(y); // Final edge
        self.positions = positions;
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Index of the row with `key`.
    pub fn index_of(&self, key: &RowKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Key of the row at `index`.
    pub fn key_at(&self, index: usize) -> Option<&RowKey> {
        self.keys.get(index)
    }

    /// Total content height.
    pub fn total_height(&self) -> f32 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Top edge of row `index`.
    pub fn row_top(&self, index: usize) -> Option<f32> {
        if index >= self.len() {
            return None;
        }
        self.positions.get(index).copied()
    }

    /// Pixel extent covering rows `start..=end` (clamped to the last row).
    pub fn range_size(&self, start: usize, end: usize) -> Option<SizeInfo> {
        let last = self.len().checked_sub(1)?;
        if start > last {
            return None;
        }
        let end = end.clamp(start, last);
        let top = self.positions.get(start).copied()?;
        let bottom = self.positions.get(end + 1).copied()?;
        Some(SizeInfo { top, bottom })
    }

    /// Pixel extent from the top of `start_key` to the bottom of `end_key`
    /// (or of `start_key` itself).
    pub fn get_size(&self, start_key: &RowKey, end_key: Option<&RowKey>) -> Option<SizeInfo> {
        let start = self.index_of(start_key)?;
        let end = match end_key {
            Some(key) => self.index_of(key)?,
            None => start,
        };
        self.range_size(start, end)
    }

    /// Find row at y position (binary search).
    pub fn row_at_y(&self, y: f32) -> Option<usize> {
        let last = self.len().checked_sub(1)?;
        let rows = self.positions.get(..self.len())?;
        let found = match rows
            .binary_search_by(|pos| pos.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Some(found.min(last))
    }

    /// Inclusive range of rows intersecting the viewport.
    ///
    /// A viewport without height shows nothing.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        if self.viewport_height <= 0.0 {
            return None;
        }
        let start = self.row_at_y(self.scroll_top)?;
        let bottom = self.scroll_top + self.viewport_height;
        let mut end = self.row_at_y(bottom)?;
        // A row starting exactly at the bottom edge is not visible
        if end > start && self.row_top(end).is_some_and(|top| top >= bottom) {
            end -= 1;
        }
        Some((start, end))
    }

    /// Largest valid vertical scroll position.
    pub fn max_scroll_top(&self) -> f32 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    /// Set the vertical scroll position, clamped to the content. Returns the
    /// applied value.
    pub fn set_scroll_top(&mut self, y: f32) -> f32 {
        let y = if y.is_nan() { 0.0 } else { y };
        self.scroll_top = y.clamp(0.0, self.max_scroll_top());
        self.scroll_top
    }

    /// Scroll so that row `index` lands according to `align`.
    ///
    /// `offset` is added above the row for `Top` and below it for `Bottom`.
    /// Out-of-range indices are clamped to the last row.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign, offset: f32) -> f32 {
        let Some(last) = self.len().checked_sub(1) else {
            return self.scroll_top;
        };
        let Some(size) = self.range_size(index.min(last), index.min(last)) else {
            return self.scroll_top;
        };
        let view_bottom = self.scroll_top + self.viewport_height;
        let target = match align {
            ScrollAlign::Top => size.top - offset,
            ScrollAlign::Bottom => size.bottom - self.viewport_height + offset,
            ScrollAlign::Auto => {
                if size.top < self.scroll_top {
                    size.top - offset
                } else if size.bottom > view_bottom {
                    size.bottom - self.viewport_height + offset
                } else {
                    self.scroll_top
                }
            }
        };
        self.set_scroll_top(target)
    }

    /// Horizontal overflow of the content.
    pub fn max_scroll_left(&self) -> f32 {
        self.scroll_width
            .map_or(0.0, |w| (w - self.viewport_width).max(0.0))
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    /// Set the horizontal scroll position. Returns true if it changed.
    pub fn set_scroll_left(&mut self, x: f32) -> bool {
        let next = self
            .direction
            .clamp_scroll_left(x, self.max_scroll_left());
        if (next - self.scroll_left).abs() <= f32::EPSILON {
            return false;
        }
        self.scroll_left = next;
        true
    }

    /// Resize the viewport, keeping scroll positions valid.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.set_scroll_top(self.scroll_top);
        self.scroll_left = self
            .direction
            .clamp_scroll_left(self.scroll_left, self.max_scroll_left());
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

    fn list(rows: usize, item_height: f32, viewport: f32) -> VirtualList {
        let mut list = VirtualList::new(item_height, viewport);
        let dups = list.set_keys((0..rows).map(RowKey::from).collect());
        assert!(dups.is_empty());
        list
    }

    #[test]
    fn test_positions() {
        let list = list(10, 20.0, 100.0);
        assert_eq!(list.total_height(), 200.0);
        assert_eq!(list.row_top(3), Some(60.0));
        assert_eq!(list.row_top(10), None);
    }

    #[test]
    fn test_row_at_y() {
        let list = list(10, 20.0, 100.0);
        assert_eq!(list.row_at_y(0.0), Some(0));
        assert_eq!(list.row_at_y(10.0), Some(0));
        assert_eq!(list.row_at_y(20.0), Some(1));
        assert_eq!(list.row_at_y(50.0), Some(2));
        assert_eq!(list.row_at_y(10_000.0), Some(9));
    }

    #[test]
    fn test_visible_range_excludes_row_at_bottom_edge() {
        let mut list = list(10, 20.0, 100.0);
        assert_eq!(list.visible_range(), Some((0, 4)));

        list.set_scroll_top(10.0);
        assert_eq!(list.visible_range(), Some((0, 5)));
    }

    #[test]
    fn test_empty_list() {
        let list = VirtualList::new(20.0, 100.0);
        assert_eq!(list.visible_range(), None);
        assert_eq!(list.total_height(), 0.0);
        assert_eq!(list.range_size(0, 0), None);
    }

    #[test]
    fn test_measured_height_follows_key() {
        let mut list = list(3, 20.0, 100.0);
        assert!(list.set_item_height(&RowKey::from(1), 50.0));
        assert_eq!(list.total_height(), 90.0);

        // Reorder: key 1 moves to the front and keeps its height
        list.set_keys(vec![RowKey::from(1), RowKey::from(0), RowKey::from(2)]);
        assert_eq!(list.row_top(1), Some(50.0));

        // Dropped keys forget their measurement
        list.set_keys(vec![RowKey::from(0)]);
        list.set_keys(vec![RowKey::from(0), RowKey::from(1)]);
        assert_eq!(list.total_height(), 40.0);
    }

    #[test]
    fn test_get_size_spans_keys() {
        let list = list(10, 20.0, 100.0);
        let size = list
            .get_size(&RowKey::from(2), Some(&RowKey::from(4)))
            .unwrap();
        assert_eq!(size.top, 40.0);
        assert_eq!(size.bottom, 100.0);
        assert_eq!(size.height(), 60.0);
        assert!(list.get_size(&RowKey::from(42), None).is_none());
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let mut list = VirtualList::new(20.0, 100.0);
        let dups = list.set_keys(vec![RowKey::from("a"), RowKey::from("b"), RowKey::from("a")]);
        assert_eq!(dups, vec![RowKey::from("a")]);
        assert_eq!(list.index_of(&RowKey::from("a")), Some(2));
    }

    #[test]
    fn test_duplicates_reported_once_in_first_repeat_order() {
        let mut list = VirtualList::new(20.0, 100.0);
        let keys = (0..1000).map(|i| RowKey::from(i % 3)).collect();
        let dups = list.set_keys(keys);
        assert_eq!(dups, vec![RowKey::from(0), RowKey::from(1), RowKey::from(2)]);
        assert_eq!(list.index_of(&RowKey::from(0)), Some(999));
        assert_eq!(list.len(), 1000);
    }

    #[test]
    fn test_zero_height_viewport_shows_nothing() {
        let mut list = list(10, 20.0, 0.0);
        assert_eq!(list.visible_range(), None);

        list.resize(300.0, 40.0);
        assert_eq!(list.visible_range(), Some((0, 1)));
    }

    #[test]
    fn test_scroll_to_index_alignments() {
        let mut list = list(100, 20.0, 100.0);

        assert_eq!(list.scroll_to_index(10, ScrollAlign::Top, 0.0), 200.0);
        assert_eq!(list.scroll_to_index(10, ScrollAlign::Top, 15.0), 185.0);
        assert_eq!(list.scroll_to_index(10, ScrollAlign::Bottom, 0.0), 120.0);

        // Already visible: auto keeps the position
        list.set_scroll_top(150.0);
        assert_eq!(list.scroll_to_index(9, ScrollAlign::Auto, 0.0), 150.0);
        // Below the viewport: auto aligns to the bottom
        assert_eq!(list.scroll_to_index(20, ScrollAlign::Auto, 0.0), 320.0);
        // Above the viewport: auto aligns to the top
        assert_eq!(list.scroll_to_index(2, ScrollAlign::Auto, 0.0), 40.0);
    }

    #[test]
    fn test_scroll_to_index_clamps() {
        let mut list = list(10, 20.0, 100.0);
        assert_eq!(list.scroll_to_index(500, ScrollAlign::Top, 0.0), 100.0);
        assert_eq!(list.set_scroll_top(-50.0), 0.0);
    }

    #[test]
    fn test_scroll_left_clamps_by_direction() {
        let mut list = list(10, 20.0, 100.0);
        list.scroll_width = Some(1000.0);
        list.resize(400.0, 100.0);

        assert!(list.set_scroll_left(10_000.0));
        assert_eq!(list.scroll_left(), 600.0);
        assert!(!list.set_scroll_left(700.0));

        list.direction = Direction::Rtl;
        assert!(list.set_scroll_left(-10_000.0));
        assert_eq!(list.scroll_left(), -600.0);
        assert!(list.set_scroll_left(50.0));
        assert_eq!(list.scroll_left(), 0.0);
    }
}
