//! Sticky offset tests
//!
//! Tests for offsets of columns fixed to the start and end edges, the header's
//! scrollbar reservation, and the fallback when widths are unknown.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{col, end, start};
use proptest::prelude::*;
use test_case::test_case;
use vtable::layout::{compute_sticky_offsets, LayoutMode};
use vtable::config::StickyConfig;
use vtable::{ColumnDescriptor, Direction, FixedSide, PhysicalSide, TableConfig, VirtualTable};

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        start("a", 60.0),
        start("b", 40.0),
        col("c", 200.0),
        col("d", 120.0),
        end("e", 80.0),
        end("f", 30.0),
    ]
}

// ============================================================================
// Offsets
// ============================================================================

#[test_case(0.0, &[30.0, 0.0] ; "without reservation")]
#[test_case(15.0, &[45.0, 15.0, 0.0] ; "with reservation")]
fn test_end_offsets(scrollbar: f32, expected: &[f32]) {
    let offsets = compute_sticky_offsets(&columns(), Direction::Ltr, scrollbar);
    assert_eq!(offsets.start, vec![0.0, 60.0]);
    assert_eq!(offsets.end, expected);
}

#[test_case(Direction::Ltr, 0, PhysicalSide::Left ; "ltr start")]
#[test_case(Direction::Ltr, 5, PhysicalSide::Right ; "ltr end")]
#[test_case(Direction::Rtl, 0, PhysicalSide::Right ; "rtl start")]
#[test_case(Direction::Rtl, 5, PhysicalSide::Left ; "rtl end")]
fn test_physical_side(direction: Direction, column: usize, expected: PhysicalSide) {
    let cols = columns();
    let offsets = compute_sticky_offsets(&cols, direction, 0.0);
    let position = offsets.position(&cols, column, direction).unwrap();
    assert_eq!(position.physical, expected);
    assert_eq!(position.offset, 0.0);
}

#[test]
fn test_unfixed_columns_have_no_position() {
    let cols = columns();
    let offsets = compute_sticky_offsets(&cols, Direction::Ltr, 0.0);
    assert!(offsets.position(&cols, 2, Direction::Ltr).is_none());
    assert!(offsets.position(&cols, 99, Direction::Ltr).is_none());
}

#[test]
fn test_interleaved_fixed_columns_keep_column_order() {
    let cols = vec![
        start("a", 10.0),
        col("b", 100.0),
        start("c", 20.0),
        end("d", 30.0),
        col("e", 100.0),
        end("f", 40.0),
    ];
    let offsets = compute_sticky_offsets(&cols, Direction::Ltr, 0.0);
    assert_eq!(offsets.start, vec![0.0, 10.0]);
    assert_eq!(offsets.end, vec![40.0, 0.0]);
    assert_eq!(offsets.position(&cols, 2, Direction::Ltr).unwrap().offset, 10.0);
    assert_eq!(offsets.position(&cols, 3, Direction::Ltr).unwrap().offset, 40.0);
}

#[test]
fn test_missing_width_yields_natural_layout() {
    let mut cols = columns();
    cols[3].width = None;
    let offsets = compute_sticky_offsets(&cols, Direction::Ltr, 15.0);
    assert_eq!(offsets.mode, LayoutMode::Natural);
    assert!(offsets.start.is_empty() && offsets.end.is_empty());
}

#[test]
fn test_non_finite_width_yields_natural_layout() {
    let mut cols = columns();
    cols[0].width = Some(f32::NAN);
    assert!(compute_sticky_offsets(&cols, Direction::Ltr, 0.0).is_natural());
}

#[test]
fn test_fixed_accepts_legacy_values() {
    let cols: Vec<ColumnDescriptor> = serde_json::from_str(
        r#"[
            {"key": "a", "width": 10, "fixed": "left"},
            {"key": "b", "width": 10, "fixed": true},
            {"key": "c", "width": 10, "fixed": "right"},
            {"key": "d", "width": 10, "fixed": false},
            {"key": "e", "width": 10}
        ]"#,
    )
    .unwrap();
    let sides: Vec<Option<FixedSide>> = cols.iter().map(|c| c.fixed).collect();
    assert_eq!(
        sides,
        vec![
            Some(FixedSide::Start),
            Some(FixedSide::Start),
            Some(FixedSide::End),
            None,
            None
        ]
    );
}

// ============================================================================
// Frames
// ============================================================================

fn frame_offsets(config: TableConfig) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let mut table = VirtualTable::json(config).unwrap();
    table.set_columns(columns());
    let frame = table.frame();
    (
        frame.body_offsets.end,
        frame.header_offsets.end,
        frame.header_col_widths,
    )
}

#[test]
fn test_header_reserves_scrollbar_body_does_not() {
    let (body, header, widths) = frame_offsets(TableConfig::default());
    assert_eq!(body, vec![30.0, 0.0]);
    assert_eq!(header, vec![45.0, 15.0, 0.0]);
    assert_eq!(widths, vec![60.0, 40.0, 200.0, 120.0, 80.0, 30.0, 15.0]);
}

#[test]
fn test_sticky_without_fixed_header_reserves_nothing() {
    let (body, header, widths) = frame_offsets(TableConfig {
        sticky: Some(StickyConfig::default()),
        fix_header: false,
        ..TableConfig::default()
    });
    assert_eq!(body, header);
    assert_eq!(widths.last(), Some(&0.0));
}

#[test]
fn test_header_col_widths_empty_until_all_known() {
    let mut table = VirtualTable::json(TableConfig::default()).unwrap();
    let mut cols = columns();
    cols[1].width = None;
    table.set_columns(cols);
    assert!(table.frame().header_col_widths.is_empty());
    assert!(table.frame().header_offsets.is_natural());
}

// ============================================================================
// Properties
// ============================================================================

fn arb_columns() -> impl Strategy<Value = Vec<ColumnDescriptor>> {
    prop::collection::vec((1.0f32..500.0, 0u8..3), 0..24).prop_map(|shapes| {
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, (width, fixed))| {
                let column = col(&format!("c{i}"), width);
                match fixed {
                    0 => column.fixed(FixedSide::Start),
                    1 => column.fixed(FixedSide::End),
                    _ => column,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_start_offsets_non_decreasing(cols in arb_columns()) {
        let offsets = compute_sticky_offsets(&cols, Direction::Ltr, 0.0);
        for pair in offsets.start.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn prop_end_offsets_non_decreasing_from_trailing_edge(cols in arb_columns()) {
        let offsets = compute_sticky_offsets(&cols, Direction::Ltr, 0.0);
        for pair in offsets.end.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn prop_reservation_only_increases_end_offsets(
        cols in arb_columns(),
        scrollbar in 0.5f32..40.0,
    ) {
        let plain = compute_sticky_offsets(&cols, Direction::Ltr, 0.0);
        let reserved = compute_sticky_offsets(&cols, Direction::Ltr, scrollbar);
        prop_assert_eq!(&plain.start, &reserved.start);
        prop_assert_eq!(reserved.end.len(), plain.end.len() + 1);
        for (before, after) in plain.end.iter().zip(&reserved.end) {
            prop_assert!(after >= before);
        }
        prop_assert_eq!(reserved.end.last().copied(), Some(0.0));
    }

    #[test]
    fn prop_identical_inputs_identical_outputs(
        cols in arb_columns(),
        scrollbar in 0.0f32..40.0,
        rtl in any::<bool>(),
    ) {
        let direction = if rtl { Direction::Rtl } else { Direction::Ltr };
        let a = compute_sticky_offsets(&cols, direction, scrollbar);
        let b = compute_sticky_offsets(&cols, direction, scrollbar);
        let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a.start), bits(&b.start));
        prop_assert_eq!(bits(&a.end), bits(&b.end));
        prop_assert_eq!(bits(&a.widths), bits(&b.widths));
    }
}
