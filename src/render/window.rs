//! Windowed rendering of flattened rows.
//!
//! Output comes on two channels: the rows inside the viewport, in flow order,
//! and "extra" rows that own a row span reaching into the viewport. Extra rows
//! are sized to their whole span and always positioned absolutely, because
//! their height differs from one row slot.

use serde::Serialize;

use crate::config::TableConfig;
use crate::layout::{resolve_span_owners, span_extent, SpanOwners, VirtualList};
use crate::types::{FlatRow, RowKey, ScrollConfig, ScrollTarget};

/// Imperative scroll handle exposed to hosts.
pub trait ScrollHandle {
    /// Current horizontal scroll position.
    fn scroll_left(&self) -> f32;

    /// Move horizontally. Returns true if the position changed.
    fn set_scroll_left(&mut self, x: f32) -> bool;

    /// Scroll vertically. Returns the applied scroll top, or `None` when the
    /// request addressed nothing (unknown key, empty table).
    fn scroll_to(&mut self, config: &ScrollConfig) -> Option<f32>;
}

/// A row rendered in its normal slot.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedRow<'a, R> {
    pub row: FlatRow<'a, R>,
    pub key: RowKey,
    /// Top edge in content coordinates
    pub top: f32,
    pub height: f32,
}

/// A span-owning row rendered outside the normal slots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraSpanRow<'a, R> {
    pub row: FlatRow<'a, R>,
    pub key: RowKey,
    /// Top edge in content coordinates
    pub top: f32,
    /// Top edge relative to the first visible row
    pub relative_top: f32,
    /// Per column: height of the spanning cell, `None` for ordinary cells
    pub cell_heights: Vec<Option<f32>>,
}

/// Everything needed to paint one pass of the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput<'a, R> {
    pub visible_rows: Vec<RenderedRow<'a, R>>,
    pub extra_span_rows: Vec<ExtraSpanRow<'a, R>>,
    /// Top of the first visible row
    pub offset_y: f32,
    pub scroll_top: f32,
    pub total_height: f32,
    pub span_owners: Option<SpanOwners>,
}

impl<R> Default for RenderOutput<'_, R> {
    fn default() -> Self {
        Self {
            visible_rows: Vec::new(),
            extra_span_rows: Vec::new(),
            offset_y: 0.0,
            scroll_top: 0.0,
            total_height: 0.0,
            span_owners: None,
        }
    }
}

/// One entry of the composed paint list.
#[derive(Debug)]
pub enum PaintItem<'o, 'a, R> {
    Row(&'o RenderedRow<'a, R>),
    Extra(&'o ExtraSpanRow<'a, R>),
}

impl<'a, R> RenderOutput<'a, R> {
    /// Both channels in paint order: flow rows first, then span overlays.
    pub fn paint_list(&self) -> Vec<PaintItem<'_, 'a, R>> {
        self.visible_rows
            .iter()
            .map(PaintItem::Row)
            .chain(self.extra_span_rows.iter().map(PaintItem::Extra))
            .collect()
    }

    /// Indices of the rows painted in normal slots.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible_rows.iter().map(|r| r.row.index).collect()
    }
}

/// Virtualized body renderer over a flattened row sequence.
#[derive(Debug, Clone, Default)]
pub struct WindowedRenderer {
    list: VirtualList,
}

impl WindowedRenderer {
    pub fn new(config: &TableConfig) -> Self {
        let mut list = VirtualList::new(config.item_height, config.scroll_y);
        list.direction = config.direction;
        list.scroll_width = config.scroll_x;
        Self { list }
    }

    /// The underlying windowed list.
    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList {
        &mut self.list
    }

    /// Adopt a new row sequence. Returns duplicate keys, if any.
    ///
    /// Duplicate keys are a data error on the caller's side; rendering goes on
    /// with the last row that carries the key.
    pub fn sync_rows<R, K>(&mut self, rows: &[FlatRow<'_, R>], key_of: K) -> Vec<RowKey>
    where
        K: Fn(&R, usize) -> RowKey,
    {
        let keys = rows
            .iter()
            .map(|row| key_of(row.record, row.index))
            .collect();
        let duplicates = self.list.set_keys(keys);
        if !duplicates.is_empty() {
            tracing::warn!(
                count = duplicates.len(),
                first = %duplicates.first().map(ToString::to_string).unwrap_or_default(),
                "duplicate row keys; the last row with each key wins"
            );
        }
        duplicates
    }

    /// Record a measured row height. Returns true if layout changed.
    pub fn set_row_height(&mut self, key: &RowKey, height: f32) -> bool {
        self.list.set_item_height(key, height)
    }

    /// Render the current window.
    ///
    /// `rows` must be the sequence last passed to [`Self::sync_rows`].
    pub fn render<'a, R, C, S>(
        &self,
        rows: &[FlatRow<'a, R>],
        columns: &[C],
        row_span: S,
    ) -> RenderOutput<'a, R>
    where
        S: Fn(&C, &FlatRow<'a, R>) -> u32,
    {
        if rows.len() != self.list.len() {
            tracing::warn!(
                rows = rows.len(),
                synced = self.list.len(),
                "render called with rows that were not synced"
            );
        }
        let row_count = rows.len().min(self.list.len());
        let Some(rows) = rows.get(..row_count) else {
            return RenderOutput::default();
        };
        let Some((start, end)) = self.list.visible_range() else {
            return RenderOutput {
                total_height: self.list.total_height(),
                scroll_top: self.list.scroll_top(),
                ..RenderOutput::default()
            };
        };
        let end = end.min(row_count.saturating_sub(1));
        let offset_y = self.list.row_top(start).unwrap_or(0.0);

        let visible_rows = (start..=end)
            .filter_map(|index| {
                let row = rows.get(index)?;
                let key = self.list.key_at(index)?.clone();
                let size = self.list.range_size(index, index)?;
                Some(RenderedRow {
                    row: *row,
                    key,
                    top: size.top,
                    height: size.height(),
                })
            })
            .collect();

        let span_owners = resolve_span_owners(rows, columns, start, end, &row_span);
        let extra_span_rows = span_owners
            .as_ref()
            .map(|owners| {
                owners
                    .owner_row_indices
                    .iter()
                    .filter_map(|&index| {
                        self.extra_row(rows, columns, index, offset_y, &row_span)
                    })
                    .collect()
            })
            .unwrap_or_default();

        RenderOutput {
            visible_rows,
            extra_span_rows,
            offset_y,
            scroll_top: self.list.scroll_top(),
            total_height: self.list.total_height(),
            span_owners,
        }
    }

    fn extra_row<'a, R, C, S>(
        &self,
        rows: &[FlatRow<'a, R>],
        columns: &[C],
        index: usize,
        offset_y: f32,
        row_span: &S,
    ) -> Option<ExtraSpanRow<'a, R>>
    where
        S: Fn(&C, &FlatRow<'a, R>) -> u32,
    {
        let row = rows.get(index)?;
        let key = self.list.key_at(index)?.clone();
        let size = self.list.get_size(&key, None)?;

        let cell_heights = columns
            .iter()
            .map(|column| {
                let span = row_span(column, row);
                if span <= 1 {
                    return None;
                }
                let last = span_extent(index, span, rows.len());
                let last_key = self.list.key_at(last)?;
                self.list
                    .get_size(&key, Some(last_key))
                    .map(|s| s.height())
            })
            .collect();

        Some(ExtraSpanRow {
            row: *row,
            key,
            top: size.top,
            relative_top: size.top - offset_y,
            cell_heights,
        })
    }
}

impl ScrollHandle for WindowedRenderer {
    fn scroll_left(&self) -> f32 {
        self.list.scroll_left()
    }

    fn set_scroll_left(&mut self, x: f32) -> bool {
        self.list.set_scroll_left(x)
    }

    fn scroll_to(&mut self, config: &ScrollConfig) -> Option<f32> {
        let align = config.effective_align();
        match &config.target {
            ScrollTarget::Top(top) => Some(self.list.set_scroll_top(*top)),
            ScrollTarget::Index { index, offset } => {
                if self.list.is_empty() {
                    tracing::debug!(index, "scroll_to on an empty table");
                    return None;
                }
                Some(
                    self.list
                        .scroll_to_index(*index, align, offset.unwrap_or(0.0)),
                )
            }
            ScrollTarget::Key { key, offset } => {
                let Some(index) = self.list.index_of(key) else {
                    tracing::debug!(%key, "scroll_to: unknown row key");
                    return None;
                };
                Some(
                    self.list
                        .scroll_to_index(index, align, offset.unwrap_or(0.0)),
                )
            }
        }
    }
}
