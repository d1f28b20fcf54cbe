//! Sticky offsets for columns pinned to the start or end edge.
//!
//! Offsets are logical (`start`/`end`), so the same arrays serve both text
//! directions; consumers place them on the physical side given by
//! [`Direction::physical_side`].

use serde::Serialize;

use crate::types::{ColumnDescriptor, Direction, FixedSide, PhysicalSide};

/// Whether the pass can use fixed column widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Fixed,
    /// Some column had no usable width; lay columns out naturally
    Natural,
}

/// Cumulative distances of fixed columns from their edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StickyOffsets {
    /// Distance of the i-th start-fixed column (column order) from the leading edge
    pub start: Vec<f32>,
    /// Distance of the j-th end-fixed column (column order) from the trailing edge
    pub end: Vec<f32>,
    /// Width of every column, in column order
    pub widths: Vec<f32>,
    pub mode: LayoutMode,
}

/// Resolved placement of one fixed column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StickyPosition {
    pub side: FixedSide,
    pub physical: PhysicalSide,
    pub offset: f32,
}

impl StickyOffsets {
    /// Fallback when widths are unknown: nothing is pinned.
    pub fn natural() -> Self {
        Self {
            mode: LayoutMode::Natural,
            ..Self::default()
        }
    }

    pub fn is_natural(&self) -> bool {
        self.mode == LayoutMode::Natural
    }

    /// Placement of the column at `column_index` in `columns`, if it is fixed.
    pub fn position(
        &self,
        columns: &[ColumnDescriptor],
        column_index: usize,
        direction: Direction,
    ) -> Option<StickyPosition> {
        if self.is_natural() {
            return None;
        }
        let side = columns.get(column_index)?.fixed?;
        let group_index = columns
            .iter()
            .take(column_index)
            .filter(|c| c.fixed == Some(side))
            .count();
        let offset = match side {
            FixedSide::Start => self.start.get(group_index),
            FixedSide::End => self.end.get(group_index),
        }
        .copied()?;
        Some(StickyPosition {
            side,
            physical: direction.physical_side(side),
            offset,
        })
    }
}

/// Compute sticky offsets for `columns`.
///
/// With a scrollbar reservation, every end offset is pushed inwards by the
/// scrollbar width and a zero-width sentinel is appended for the scrollbar
/// column itself. Any column without a usable width yields
/// [`StickyOffsets::natural`].
///
/// The direction does not change the arrays; it only decides which physical
/// side each logical group is drawn on.
pub fn compute_sticky_offsets(
    columns: &[ColumnDescriptor],
    direction: Direction,
    scrollbar_reserved_width: f32,
) -> StickyOffsets {
    let Some(widths) = columns
        .iter()
        .map(ColumnDescriptor::usable_width)
        .collect::<Option<Vec<f32>>>()
    else {
        tracing::debug!(
            columns = columns.len(),
            ?direction,
            "column without width, falling back to natural layout"
        );
        return StickyOffsets::natural();
    };

    let mut start = Vec::new();
    let mut total = 0.0;
    for (column, width) in columns.iter().zip(&widths) {
        if column.fixed == Some(FixedSide::Start) {
            start.push(total);
            total += width;
        }
    }

    let mut end = Vec::new();
    let mut total = 0.0;
    for (column, width) in columns.iter().zip(&widths).rev() {
        if column.fixed == Some(FixedSide::End) {
            end.push(total);
            total += width;
        }
    }
    end.reverse();

    let reservation = if scrollbar_reserved_width.is_finite() {
        scrollbar_reserved_width.max(0.0)
    } else {
        0.0
    };
    if reservation > 0.0 {
        for offset in &mut end {
            *offset += reservation;
        }
        end.push(0.0);
    }

    StickyOffsets {
        start,
        end,
        widths,
        mode: LayoutMode::Fixed,
    }
}

/// Widths of the first `count` columns, or `None` if any is still unknown.
pub fn merged_column_widths(widths: &[Option<f32>], count: usize) -> Option<Vec<f32>> {
    if widths.len() < count {
        return None;
    }
    widths.iter().take(count).copied().collect()
}

/// Header column widths: the body widths plus the scrollbar column.
pub fn header_col_widths(widths: &[Option<f32>], count: usize, scrollbar: f32) -> Vec<f32> {
    merged_column_widths(widths, count).map_or_else(Vec::new, |mut merged| {
        merged.push(scrollbar);
        merged
    })
}

/// Right edge of every column measured from the leading edge.
///
/// Columns without a width contribute nothing.
pub fn column_offsets(columns: &[ColumnDescriptor]) -> Vec<f32> {
    let mut total = 0.0;
    columns
        .iter()
        .map(|column| {
            total += column.usable_width().unwrap_or(0.0);
            total
        })
        .collect()
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

    fn col(key: &str, width: f32, fixed: Option<FixedSide>) -> ColumnDescriptor {
        ColumnDescriptor {
            key: key.to_string(),
            width: Some(width),
            fixed,
            row_span_field: None,
        }
    }

    fn sample() -> Vec<ColumnDescriptor> {
        vec![
            col("a", 50.0, Some(FixedSide::Start)),
            col("b", 30.0, Some(FixedSide::Start)),
            col("c", 100.0, None),
            col("d", 40.0, Some(FixedSide::End)),
            col("e", 20.0, Some(FixedSide::End)),
        ]
    }

    #[test]
    fn test_start_and_end_offsets() {
        let offsets = compute_sticky_offsets(&sample(), Direction::Ltr, 0.0);
        assert_eq!(offsets.start, vec![0.0, 50.0]);
        assert_eq!(offsets.end, vec![20.0, 0.0]);
        assert_eq!(offsets.widths, vec![50.0, 30.0, 100.0, 40.0, 20.0]);
        assert_eq!(offsets.mode, LayoutMode::Fixed);
    }

    #[test]
    fn test_scrollbar_reservation() {
        let offsets = compute_sticky_offsets(&sample(), Direction::Ltr, 15.0);
        assert_eq!(offsets.start, vec![0.0, 50.0]);
        assert_eq!(offsets.end, vec![35.0, 15.0, 0.0]);
    }

    #[test]
    fn test_direction_does_not_swap_groups() {
        let ltr = compute_sticky_offsets(&sample(), Direction::Ltr, 0.0);
        let rtl = compute_sticky_offsets(&sample(), Direction::Rtl, 0.0);
        assert_eq!(ltr, rtl);

        let pos = rtl.position(&sample(), 1, Direction::Rtl).unwrap();
        assert_eq!(pos.side, FixedSide::Start);
        assert_eq!(pos.physical, PhysicalSide::Right);
        assert_eq!(pos.offset, 50.0);

        let pos = ltr.position(&sample(), 3, Direction::Ltr).unwrap();
        assert_eq!(pos.physical, PhysicalSide::Right);
        assert_eq!(pos.offset, 20.0);

        assert!(ltr.position(&sample(), 2, Direction::Ltr).is_none());
    }

    #[test]
    fn test_missing_width_falls_back() {
        let mut cols = sample();
        cols[2].width = None;
        let offsets = compute_sticky_offsets(&cols, Direction::Ltr, 15.0);
        assert!(offsets.is_natural());
        assert!(offsets.start.is_empty());
        assert!(offsets.end.is_empty());
        assert!(offsets.position(&cols, 0, Direction::Ltr).is_none());
    }

    #[test]
    fn test_merged_column_widths() {
        assert_eq!(
            merged_column_widths(&[Some(10.0), Some(20.0)], 2),
            Some(vec![10.0, 20.0])
        );
        assert_eq!(merged_column_widths(&[Some(10.0), None], 2), None);
        assert_eq!(merged_column_widths(&[Some(10.0)], 2), None);
        assert_eq!(
            header_col_widths(&[Some(10.0), Some(20.0)], 2, 15.0),
            vec![10.0, 20.0, 15.0]
        );
        assert!(header_col_widths(&[None], 1, 15.0).is_empty());
    }

    #[test]
    fn test_column_offsets() {
        assert_eq!(
            column_offsets(&sample()),
            vec![50.0, 80.0, 180.0, 220.0, 240.0]
        );
    }
}
