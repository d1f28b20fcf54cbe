//! Horizontal scroll synchronization between the header, body and summary.
//!
//! Each surface scrolls independently, so every resolved change is broadcast
//! to the others. The surface that produced a change is the source of truth
//! for that gesture; when a follower reports back the value it was just moved
//! to, the echo is dropped instead of bouncing between surfaces.

use serde::Serialize;

use crate::types::{Direction, PingState, ScrollEvent, ScrollSource};

/// Scroll geometry of the surface receiving a wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_width: f32,
    pub client_width: f32,
}

impl ScrollMetrics {
    pub fn max_scroll(self) -> f32 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

/// Translate a horizontal wheel delta into a clamped scroll position.
///
/// Returns `None` for a zero delta so vertical wheel scrolling passes through.
pub fn wheel_scroll_left(
    delta_x: f32,
    current_scroll_left: f32,
    scroll_width: f32,
    client_width: f32,
    direction: Direction,
) -> Option<f32> {
    if delta_x == 0.0 || delta_x.is_nan() {
        return None;
    }
    let max_scroll = scroll_width - client_width;
    Some(direction.clamp_scroll_left(current_scroll_left + delta_x, max_scroll))
}

/// Result of handling one wheel event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelOutcome {
    pub next_scroll_left: Option<f32>,
    /// Suppress the platform's own horizontal scroll
    pub prevent_default: bool,
    pub event: Option<ScrollEvent>,
}

impl WheelOutcome {
    fn ignored() -> Self {
        Self {
            next_scroll_left: None,
            prevent_default: false,
            event: None,
        }
    }
}

/// Shared horizontal scroll position of a table.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    scroll_left: f32,
    direction: Direction,
    /// Followers moved by the last broadcast, with the value they were given
    pending_echo: Vec<(ScrollSource, f32)>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(Direction::Ltr)
    }
}

impl ScrollSync {
    pub fn new(direction: Direction) -> Self {
        Self {
            scroll_left: 0.0,
            direction,
            pending_echo: Vec::new(),
        }
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.pending_echo.clear();
    }

    /// Handle a wheel event on `source`.
    ///
    /// Any horizontal delta is consumed, even one that clamping turns into no
    /// movement, so an enclosing scroll region never handles it twice.
    pub fn on_wheel(
        &mut self,
        source: ScrollSource,
        delta_x: f32,
        metrics: ScrollMetrics,
    ) -> WheelOutcome {
        let Some(next) = wheel_scroll_left(
            delta_x,
            self.scroll_left,
            metrics.scroll_width,
            metrics.client_width,
            self.direction,
        ) else {
            return WheelOutcome::ignored();
        };
        let event = self.broadcast(source, next);
        WheelOutcome {
            next_scroll_left: Some(next),
            prevent_default: true,
            event: Some(event),
        }
    }

    /// Record a scroll position reported by `source`.
    ///
    /// Returns the event to broadcast, or `None` when the report is the echo
    /// of a previous broadcast to that surface.
    pub fn on_scroll(&mut self, source: ScrollSource, scroll_left: f32) -> Option<ScrollEvent> {
        if scroll_left.is_nan() {
            return None;
        }
        if let Some(pos) = self.pending_echo.iter().position(|(s, _)| *s == source) {
            let (_, expected) = self.pending_echo.swap_remove(pos);
            if (expected - scroll_left).abs() <= f32::EPSILON {
                return None;
            }
        }
        Some(self.broadcast(source, scroll_left))
    }

    fn broadcast(&mut self, source: ScrollSource, scroll_left: f32) -> ScrollEvent {
        self.scroll_left = scroll_left;
        let targets: Vec<ScrollSource> = ScrollSource::ALL
            .into_iter()
            .filter(|s| *s != source)
            .collect();
        self.pending_echo = targets.iter().map(|s| (*s, scroll_left)).collect();
        tracing::trace!(?source, scroll_left, "scroll broadcast");
        ScrollEvent {
            scroll_left,
            source,
            targets,
        }
    }

    /// Whether content is scrolled under the start or end fixed columns.
    pub fn ping_state(&self, scroll_width: f32, client_width: f32) -> PingState {
        let abs = self.scroll_left.abs();
        PingState {
            start: abs > 0.0,
            end: abs < scroll_width - client_width,
        }
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

    const METRICS: ScrollMetrics = ScrollMetrics {
        scroll_width: 1000.0,
        client_width: 400.0,
    };

    #[test]
    fn test_wheel_clamps() {
        assert_eq!(
            wheel_scroll_left(10_000.0, 0.0, 1000.0, 400.0, Direction::Ltr),
            Some(600.0)
        );
        assert_eq!(
            wheel_scroll_left(10_000.0, 0.0, 1000.0, 400.0, Direction::Rtl),
            Some(0.0)
        );
        assert_eq!(
            wheel_scroll_left(-10_000.0, 0.0, 1000.0, 400.0, Direction::Rtl),
            Some(-600.0)
        );
        assert_eq!(
            wheel_scroll_left(0.0, 100.0, 1000.0, 400.0, Direction::Ltr),
            None
        );
    }

    #[test]
    fn test_wheel_without_overflow_stays_at_zero() {
        assert_eq!(
            wheel_scroll_left(50.0, 0.0, 300.0, 400.0, Direction::Ltr),
            Some(0.0)
        );
    }

    #[test]
    fn test_on_wheel_consumes_clamped_delta() {
        let mut sync = ScrollSync::new(Direction::Ltr);
        let outcome = sync.on_wheel(ScrollSource::Header, -20.0, METRICS);

        assert!(outcome.prevent_default);
        assert_eq!(outcome.next_scroll_left, Some(0.0));
        let event = outcome.event.unwrap();
        assert_eq!(event.source, ScrollSource::Header);
        assert_eq!(event.targets, vec![ScrollSource::Body, ScrollSource::Summary]);
    }

    #[test]
    fn test_on_wheel_zero_delta_is_ignored() {
        let mut sync = ScrollSync::new(Direction::Ltr);
        let outcome = sync.on_wheel(ScrollSource::Header, 0.0, METRICS);
        assert!(!outcome.prevent_default);
        assert!(outcome.event.is_none());
        assert_eq!(sync.scroll_left(), 0.0);
    }

    #[test]
    fn test_echo_is_dropped() {
        let mut sync = ScrollSync::new(Direction::Ltr);
        let event = sync.on_scroll(ScrollSource::Body, 120.0).unwrap();
        assert_eq!(event.targets, vec![ScrollSource::Header, ScrollSource::Summary]);

        // Header reports the position it was moved to
        assert!(sync.on_scroll(ScrollSource::Header, 120.0).is_none());
        // A genuine header drag afterwards is a new gesture
        let event = sync.on_scroll(ScrollSource::Header, 80.0).unwrap();
        assert_eq!(event.source, ScrollSource::Header);
        assert_eq!(sync.scroll_left(), 80.0);
    }

    #[test]
    fn test_ping_state() {
        let mut sync = ScrollSync::new(Direction::Rtl);
        assert_eq!(
            sync.ping_state(1000.0, 400.0),
            PingState {
                start: false,
                end: true
            }
        );
        sync.on_scroll(ScrollSource::Body, -600.0);
        assert_eq!(
            sync.ping_state(1000.0, 400.0),
            PingState {
                start: true,
                end: false
            }
        );
    }
}
