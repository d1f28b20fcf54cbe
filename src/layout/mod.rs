//! Layout engine for virtualized tables.
//!
//! This module handles:
//! - Row geometry and scroll state of the windowed list
//! - Widening windows to whole row spans
//! - Sticky offsets for fixed columns

mod span;
mod sticky;
mod virtual_list;

pub use span::{resolve_span_owners, span_extent, SpanOwners};
pub use sticky::{
    column_offsets, compute_sticky_offsets, header_col_widths, merged_column_widths, LayoutMode,
    StickyOffsets, StickyPosition,
};
pub use virtual_list::{VirtualList, DEFAULT_ITEM_HEIGHT};
