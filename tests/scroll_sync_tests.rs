//! Horizontal scroll synchronization tests
//!
//! Tests for wheel translation over the header, clamping in both text
//! directions, echo suppression between surfaces, and the ping state.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{col, config, numbered};
use serde_json::Value;
use test_case::test_case;
use vtable::render::ScrollHandle;
use vtable::scroll_sync::{wheel_scroll_left, ScrollMetrics};
use vtable::{Direction, ScrollSource, TableConfig, VirtualTable};

/// 1000px of content in a 400px viewport
fn wide_table(direction: Direction) -> VirtualTable<Value> {
    let mut table = VirtualTable::json(TableConfig {
        scroll_x: Some(1000.0),
        direction,
        ..config(20.0, 100.0)
    })
    .unwrap();
    table.set_columns(vec![col("a", 500.0), col("b", 500.0)]);
    table.set_data(numbered(10));
    table.resize(400.0, 100.0);
    table
}

#[test_case(Direction::Ltr, 10_000.0 => Some(600.0) ; "ltr clamps to overflow")]
#[test_case(Direction::Rtl, 10_000.0 => Some(0.0) ; "rtl clamps to zero")]
#[test_case(Direction::Rtl, -10_000.0 => Some(-600.0) ; "rtl scrolls negative")]
#[test_case(Direction::Ltr, -10.0 => Some(0.0) ; "ltr never negative")]
#[test_case(Direction::Ltr, 0.0 => None ; "zero delta")]
fn test_wheel_scroll_left(direction: Direction, delta: f32) -> Option<f32> {
    wheel_scroll_left(delta, 0.0, 1000.0, 400.0, direction)
}

#[test]
fn test_metrics_max_scroll() {
    let metrics = ScrollMetrics {
        scroll_width: 300.0,
        client_width: 400.0,
    };
    assert_eq!(metrics.max_scroll(), 0.0);
}

// ============================================================================
// Through the table
// ============================================================================

#[test]
fn test_header_wheel_moves_every_surface() {
    let mut table = wide_table(Direction::Ltr);
    let outcome = table.on_wheel(ScrollSource::Header, 10_000.0);

    assert!(outcome.prevent_default);
    let event = outcome.event.unwrap();
    assert_eq!(event.scroll_left, 600.0);
    assert_eq!(event.targets, vec![ScrollSource::Body, ScrollSource::Summary]);
    assert_eq!(table.scroll_left(), 600.0);
    assert_eq!(table.frame().scroll_left, 600.0);
}

#[test]
fn test_rtl_wheel_past_origin_stays_at_zero() {
    let mut table = wide_table(Direction::Rtl);
    let outcome = table.on_wheel(ScrollSource::Header, 10_000.0);
    assert_eq!(outcome.next_scroll_left, Some(0.0));
    assert_eq!(table.scroll_left(), 0.0);

    table.on_wheel(ScrollSource::Header, -250.0);
    assert_eq!(table.scroll_left(), -250.0);
}

#[test]
fn test_zero_delta_emits_nothing() {
    let mut table = wide_table(Direction::Ltr);
    let outcome = table.on_wheel(ScrollSource::Header, 0.0);
    assert!(!outcome.prevent_default);
    assert!(outcome.event.is_none());
    assert!(outcome.next_scroll_left.is_none());
}

#[test]
fn test_body_scroll_is_broadcast_once() {
    let mut table = wide_table(Direction::Ltr);
    let event = table.on_scroll(ScrollSource::Body, 150.0).unwrap();
    assert_eq!(event.source, ScrollSource::Body);
    assert_eq!(event.targets, vec![ScrollSource::Header, ScrollSource::Summary]);

    // Followers echo the value they were moved to
    assert!(table.on_scroll(ScrollSource::Header, 150.0).is_none());
    assert!(table.on_scroll(ScrollSource::Summary, 150.0).is_none());
    assert_eq!(table.scroll_left(), 150.0);
}

#[test]
fn test_summary_scroll_moves_body() {
    let mut table = wide_table(Direction::Ltr);
    let event = table.on_scroll(ScrollSource::Summary, 90.0).unwrap();
    assert_eq!(event.scroll_left, 90.0);
    assert_eq!(table.scroll_left(), 90.0);
}

#[test]
fn test_set_scroll_left_is_clamped_and_broadcast() {
    let mut table = wide_table(Direction::Ltr);
    let event = table.set_scroll_left_event(5_000.0).unwrap();
    assert_eq!(event.scroll_left, 600.0);
    assert!(table.set_scroll_left_event(600.0).is_none());
}

#[test]
fn test_ping_state_follows_scroll() {
    let mut table = wide_table(Direction::Ltr);
    let ping = table.frame().ping;
    assert!(!ping.start && ping.end);

    table.on_wheel(ScrollSource::Header, 300.0);
    let ping = table.frame().ping;
    assert!(ping.start && ping.end);

    table.on_wheel(ScrollSource::Header, 300.0);
    let ping = table.frame().ping;
    assert!(ping.start && !ping.end);
}

#[test]
fn test_direction_change_resets_scroll() {
    let mut table = wide_table(Direction::Ltr);
    table.on_wheel(ScrollSource::Header, 300.0);
    let event = table.set_direction(Direction::Rtl).unwrap();
    assert_eq!(event.scroll_left, 0.0);
    assert_eq!(event.source, ScrollSource::Body);
    assert_eq!(event.targets, vec![ScrollSource::Header, ScrollSource::Summary]);
    assert_eq!(table.scroll_left(), 0.0);
    assert_eq!(table.on_wheel(ScrollSource::Header, 100.0).next_scroll_left, Some(0.0));
}

#[test]
fn test_content_width_defaults_to_column_widths() {
    let mut table = VirtualTable::json(config(20.0, 100.0)).unwrap();
    table.set_columns(vec![col("a", 300.0), col("b", 300.0)]);
    table.resize(400.0, 100.0);
    let outcome = table.on_wheel(ScrollSource::Header, 1_000.0);
    assert_eq!(outcome.next_scroll_left, Some(200.0));
}

// ============================================================================
// Layout changes that shrink the scroll range
// ============================================================================

#[test]
fn test_resize_clamp_is_broadcast() {
    let mut table = wide_table(Direction::Ltr);
    table.on_wheel(ScrollSource::Header, 10_000.0);
    assert_eq!(table.scroll_left(), 600.0);

    let event = table.resize(900.0, 100.0).unwrap();
    assert_eq!(event.scroll_left, 100.0);
    assert_eq!(event.source, ScrollSource::Body);
    assert_eq!(event.targets, vec![ScrollSource::Header, ScrollSource::Summary]);

    let ping = table.frame().ping;
    assert!(ping.start && !ping.end);
}

#[test]
fn test_wheel_after_resize_starts_from_clamped_position() {
    let mut table = wide_table(Direction::Ltr);
    table.on_wheel(ScrollSource::Header, 10_000.0);
    table.resize(900.0, 100.0);

    let outcome = table.on_wheel(ScrollSource::Header, -10.0);
    assert_eq!(outcome.next_scroll_left, Some(90.0));
    assert_eq!(table.scroll_left(), 90.0);
}

#[test]
fn test_resize_without_clamp_emits_nothing() {
    let mut table = wide_table(Direction::Ltr);
    table.on_wheel(ScrollSource::Header, 100.0);
    assert!(table.resize(500.0, 100.0).is_none());
    assert_eq!(table.scroll_left(), 100.0);
}

#[test]
fn test_narrower_columns_clamp_is_broadcast() {
    let mut table = VirtualTable::json(config(20.0, 100.0)).unwrap();
    table.set_columns(vec![col("a", 500.0), col("b", 500.0)]);
    table.resize(400.0, 100.0);
    table.on_wheel(ScrollSource::Header, 10_000.0);
    assert_eq!(table.scroll_left(), 600.0);

    let update = table.set_columns(vec![col("a", 250.0), col("b", 250.0)]);
    let event = update.scroll_event.unwrap();
    assert_eq!(event.scroll_left, 100.0);
    assert_eq!(event.targets, vec![ScrollSource::Header, ScrollSource::Summary]);

    let outcome = table.on_wheel(ScrollSource::Header, -10.0);
    assert_eq!(outcome.next_scroll_left, Some(90.0));
}

#[test]
fn test_header_scroll_past_range_is_clamped() {
    let mut table = wide_table(Direction::Ltr);
    let event = table.on_scroll(ScrollSource::Header, 5_000.0).unwrap();
    assert_eq!(event.scroll_left, 600.0);
    assert_eq!(event.targets, vec![ScrollSource::Body, ScrollSource::Summary]);
    assert_eq!(table.scroll_left(), 600.0);
}
