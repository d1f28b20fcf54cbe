//! Row-span resolution for windowed rendering.
//!
//! A windowed list assumes one slot per row, but a cell with `rowSpan = N`
//! covers N rows and the rows it subsumes report `rowSpan = 0`. Before a
//! window is painted its edges are widened to the rows that own any span
//! crossing them, so no spanning cell is ever cut in half.
//!
//! The widening scans are linear and unbounded: a span covering the whole
//! dataset makes the whole dataset render.

use serde::Serialize;

use crate::types::FlatRow;

/// Rows that must be rendered to keep spanning cells intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanOwners {
    /// First row index to render (may precede the window)
    pub first_owner_index: usize,
    /// Last row index to render (may follow the window)
    pub last_owner_index: usize,
    /// Rows in `first..=last` with at least one cell spanning more than one row
    pub owner_row_indices: Vec<usize>,
}

/// Widen `window_start..=window_end` to whole spans and collect owner rows.
///
/// `row_span(column, row)` returns the cell's span: 1 for a normal cell, 0 for
/// a placeholder covered by an earlier row, N > 1 for the owner of N rows.
/// Returns `None` when there are no rows.
pub fn resolve_span_owners<'a, R, C, F>(
    rows: &[FlatRow<'a, R>],
    columns: &[C],
    window_start: usize,
    window_end: usize,
    row_span: F,
) -> Option<SpanOwners>
where
    F: Fn(&C, &FlatRow<'a, R>) -> u32,
{
    let last = rows.len().checked_sub(1)?;
    let window_end = window_end.min(last);
    let window_start = window_start.min(window_end);
    let span_at =
        |column: &C, index: usize| rows.get(index).map_or(1, |row| row_span(column, row));

    // Walk back while some column is still a placeholder
    let mut pending: Vec<&C> = columns
        .iter()
        .filter(|column| span_at(*column, window_start) == 0)
        .collect();
    let mut first_owner_index = window_start;
    let mut index = window_start;
    while !pending.is_empty() {
        pending.retain(|column| span_at(*column, index) == 0);
        first_owner_index = index;
        if pending.is_empty() || index == 0 {
            break;
        }
        index -= 1;
    }

    // Walk forward until every column closes its span
    let mut pending: Vec<&C> = columns
        .iter()
        .filter(|column| span_at(*column, window_end) != 1)
        .collect();
    let mut last_owner_index = window_end;
    let mut index = window_end;
    while !pending.is_empty() {
        pending.retain(|column| span_at(*column, index) != 1);
        if pending.is_empty() {
            last_owner_index = index.saturating_sub(1).max(window_end);
            break;
        }
        if index == last {
            last_owner_index = last;
            break;
        }
        index += 1;
    }

    let owner_row_indices = (first_owner_index..=last_owner_index)
        .filter(|&index| columns.iter().any(|column| span_at(column, index) > 1))
        .collect();

    Some(SpanOwners {
        first_owner_index,
        last_owner_index,
        owner_row_indices,
    })
}

/// Last row covered by a span starting at `owner_index`, clamped to the data.
pub fn span_extent(owner_index: usize, row_span: u32, row_count: usize) -> usize {
    let covered = usize::try_from(row_span.max(1)).unwrap_or(usize::MAX);
    owner_index
        .saturating_add(covered - 1)
        .min(row_count.saturating_sub(1))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    /// Rows carrying one span per column.
    fn rows(spans: &[Vec<u32>]) -> Vec<FlatRow<'_, Vec<u32>>> {
        spans
            .iter()
            .enumerate()
            .map(|(index, record)| FlatRow {
                record,
                indent: 0,
                index,
            })
            .collect()
    }

    fn span(column: &usize, row: &FlatRow<'_, Vec<u32>>) -> u32 {
        row.record.get(*column).copied().unwrap_or(1)
    }

    /// Ten rows, one column; rows 5..=7 merged.
    fn merged_5_to_7() -> Vec<Vec<u32>> {
        (0..10)
            .map(|i| match i {
                5 => vec![3],
                6 | 7 => vec![0],
                _ => vec![1],
            })
            .collect()
    }

    #[test]
    fn test_window_inside_span_walks_back_to_owner() {
        let data = merged_5_to_7();
        let rows = rows(&data);
        let owners = resolve_span_owners(&rows, &[0usize], 6, 6, span).unwrap();

        assert!(owners.first_owner_index <= 5);
        assert_eq!(owners.first_owner_index, 5);
        assert_eq!(owners.last_owner_index, 7);
        assert_eq!(owners.owner_row_indices, vec![5]);
    }

    #[test]
    fn test_window_without_spans_is_unchanged() {
        let data = vec![vec![1]; 10];
        let rows = rows(&data);
        let owners = resolve_span_owners(&rows, &[0usize], 2, 4, span).unwrap();

        assert_eq!(owners.first_owner_index, 2);
        assert_eq!(owners.last_owner_index, 4);
        assert!(owners.owner_row_indices.is_empty());
    }

    #[test]
    fn test_window_ending_on_owner_extends_forward() {
        let data = merged_5_to_7();
        let rows = rows(&data);
        let owners = resolve_span_owners(&rows, &[0usize], 2, 5, span).unwrap();

        assert_eq!(owners.first_owner_index, 2);
        assert_eq!(owners.last_owner_index, 7);
        assert_eq!(owners.owner_row_indices, vec![5]);
    }

    #[test]
    fn test_span_past_end_is_clamped() {
        // Owner claims 5 rows but only 3 exist after it
        let data = vec![vec![1], vec![5], vec![0], vec![0]];
        let rows = rows(&data);
        let owners = resolve_span_owners(&rows, &[0usize], 0, 2, span).unwrap();

        assert_eq!(owners.last_owner_index, 3);
        assert_eq!(owners.owner_row_indices, vec![1]);
        assert_eq!(span_extent(1, 5, rows.len()), 3);
    }

    #[test]
    fn test_orphan_placeholders_walk_to_zero() {
        let data = vec![vec![0], vec![0], vec![0]];
        let rows = rows(&data);
        let owners = resolve_span_owners(&rows, &[0usize], 2, 2, span).unwrap();

        assert_eq!(owners.first_owner_index, 0);
        assert!(owners.owner_row_indices.is_empty());
    }

    #[test]
    fn test_columns_resolve_independently() {
        // Column 0 merges rows 1..=2, column 1 merges rows 0..=3
        let data = vec![vec![1, 4], vec![2, 0], vec![0, 0], vec![1, 0], vec![1, 1]];
        let rows = rows(&data);
        let owners = resolve_span_owners(&rows, &[0usize, 1], 2, 2, span).unwrap();

        assert_eq!(owners.first_owner_index, 0);
        assert_eq!(owners.last_owner_index, 3);
        assert_eq!(owners.owner_row_indices, vec![0, 1]);
    }

    #[test]
    fn test_empty_rows() {
        let data: Vec<Vec<u32>> = Vec::new();
        let rows = rows(&data);
        assert!(resolve_span_owners(&rows, &[0usize], 0, 0, span).is_none());
    }

    #[test]
    fn test_span_extent() {
        assert_eq!(span_extent(5, 3, 10), 7);
        assert_eq!(span_extent(5, 1, 10), 5);
        assert_eq!(span_extent(5, 0, 10), 5);
        assert_eq!(span_extent(8, 3, 10), 9);
    }
}
