//! Scroll and wheel event plumbing for `TableView`.
//!
//! Methods here are helpers called from the wasm-exported API in `mod.rs`.
//! Callbacks into JavaScript only run on wasm32; elsewhere they are skipped.

use js_sys::Function;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::WheelEvent;

use super::TableView;
#[cfg(target_arch = "wasm32")]
use super::to_js;
use crate::types::ScrollEvent;
#[cfg(target_arch = "wasm32")]
use crate::types::ScrollSource;

/// Invoke `onColumnResize(key, width)`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn call_column_resize(callback: &Function, key: &str, width: f32) {
    if let Err(e) = callback.call2(
        &JsValue::NULL,
        &JsValue::from_str(key),
        &JsValue::from_f64(f64::from(width)),
    ) {
        tracing::warn!(?e, key, "onColumnResize callback threw");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn call_column_resize(_callback: &Function, key: &str, width: f32) {
    tracing::trace!(key, width, "column resized");
}

impl TableView {
    /// Forward a resolved scroll change to the host's `onScroll`.
    pub(crate) fn emit_scroll(&self, event: &ScrollEvent) {
        let Some(callback) = &self.on_scroll else {
            return;
        };
        Self::invoke_scroll_callback(callback, event);
    }

    #[cfg(target_arch = "wasm32")]
    fn invoke_scroll_callback(callback: &Function, event: &ScrollEvent) {
        let payload = match to_js(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(?e, "failed to serialize scroll event");
                return;
            }
        };
        if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
            tracing::warn!(?e, "onScroll callback threw");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn invoke_scroll_callback(_callback: &Function, event: &ScrollEvent) {
        tracing::trace!(scroll_left = event.scroll_left, "scroll event");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl TableView {
    /// Translate a wheel event over the header into a horizontal scroll.
    ///
    /// Vertical-only wheels pass through untouched. Any horizontal delta is
    /// consumed, so a containing scroll region does not scroll as well.
    pub fn handle_header_wheel(&mut self, event: &WheelEvent) {
        // deltaX is f64 in the DOM; scroll positions are f32 throughout
        #[allow(clippy::cast_possible_truncation)]
        let delta_x = event.delta_x() as f32;
        let outcome = self.table.on_wheel(ScrollSource::Header, delta_x);
        if outcome.prevent_default {
            event.prevent_default();
        }
        if let Some(scroll_event) = &outcome.event {
            self.emit_scroll(scroll_event);
        }
    }

    /// Same as [`Self::handle_header_wheel`], with header geometry measured by
    /// the host (`scrollWidth`, `clientWidth`).
    pub fn handle_header_wheel_with_metrics(
        &mut self,
        event: &WheelEvent,
        scroll_width: f32,
        client_width: f32,
    ) {
        #[allow(clippy::cast_possible_truncation)]
        let delta_x = event.delta_x() as f32;
        let outcome = self.table.on_wheel_with_metrics(
            ScrollSource::Header,
            delta_x,
            crate::scroll_sync::ScrollMetrics {
                scroll_width,
                client_width,
            },
        );
        if outcome.prevent_default {
            event.prevent_default();
        }
        if let Some(scroll_event) = &outcome.event {
            self.emit_scroll(scroll_event);
        }
    }
}
