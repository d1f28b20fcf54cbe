//! Table-wide configuration, threaded explicitly into each component.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VtableError};
use crate::layout::DEFAULT_ITEM_HEIGHT;
use crate::types::Direction;

/// Default viewport height of the body in pixels.
pub const DEFAULT_SCROLL_Y: f32 = 400.0;

/// Default width reserved for a vertical scrollbar in the header.
pub const DEFAULT_SCROLLBAR_SIZE: f32 = 15.0;

/// Sticky header / scrollbar placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StickyConfig {
    /// Distance of the sticky header from the top of the page
    pub offset_header: f32,
    /// Distance of the sticky horizontal scrollbar from the bottom
    pub offset_scroll: f32,
}

/// Configuration shared by every part of a virtual table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Estimated height of an unmeasured row
    pub item_height: f32,
    /// Body viewport height
    pub scroll_y: f32,
    /// Content width; enables horizontal scrolling when larger than the viewport
    pub scroll_x: Option<f32>,
    pub direction: Direction,
    pub sticky: Option<StickyConfig>,
    /// Header is a separate fixed element
    pub fix_header: bool,
    /// Width of the platform's vertical scrollbar
    pub scrollbar_size: f32,
    /// Record field holding child records
    pub children_column_name: String,
    /// Record field holding the row key (JSON records)
    pub row_key: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            scroll_y: DEFAULT_SCROLL_Y,
            scroll_x: None,
            direction: Direction::Ltr,
            sticky: None,
            fix_header: true,
            scrollbar_size: DEFAULT_SCROLLBAR_SIZE,
            children_column_name: "children".to_string(),
            row_key: "key".to_string(),
        }
    }
}

impl TableConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns an error on malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no layout pass can use.
    ///
    /// # Errors
    /// Returns [`VtableError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(VtableError::InvalidConfig(format!(
                "itemHeight must be positive, got {}",
                self.item_height
            )));
        }
        if !(self.scroll_y.is_finite() && self.scroll_y >= 0.0) {
            return Err(VtableError::InvalidConfig(format!(
                "scrollY must be non-negative, got {}",
                self.scroll_y
            )));
        }
        if self
            .scroll_x
            .is_some_and(|w| !(w.is_finite() && w >= 0.0))
        {
            return Err(VtableError::InvalidConfig(
                "scrollX must be non-negative".to_string(),
            ));
        }
        if !(self.scrollbar_size.is_finite() && self.scrollbar_size >= 0.0) {
            return Err(VtableError::InvalidConfig(format!(
                "scrollbarSize must be non-negative, got {}",
                self.scrollbar_size
            )));
        }
        if self.children_column_name.is_empty() {
            return Err(VtableError::InvalidConfig(
                "childrenColumnName must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky.is_some()
    }

    /// Width the header reserves for the body's vertical scrollbar.
    ///
    /// A sticky header that is not fixed scrolls with the page and reserves
    /// nothing.
    pub fn scrollbar_reservation(&self) -> f32 {
        if self.is_sticky() && !self.fix_header {
            0.0
        } else {
            self.scrollbar_size
        }
    }

    /// Bottom offset of the sticky horizontal scrollbar, if sticky.
    pub fn horizontal_scrollbar_bottom(&self) -> Option<f32> {
        self.sticky.as_ref().map(|s| s.offset_scroll)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = TableConfig::from_json("{}").unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.item_height, 24.0);
        assert_eq!(config.scrollbar_reservation(), DEFAULT_SCROLLBAR_SIZE);
    }

    #[test]
    fn test_camel_case_fields() {
        let config = TableConfig::from_json(
            r#"{"itemHeight": 32, "scrollY": 300, "scrollX": 1200, "direction": "rtl",
                "childrenColumnName": "items", "rowKey": "id"}"#,
        )
        .unwrap();
        assert_eq!(config.item_height, 32.0);
        assert_eq!(config.scroll_x, Some(1200.0));
        assert_eq!(config.direction, Direction::Rtl);
        assert_eq!(config.children_column_name, "items");
        assert_eq!(config.row_key, "id");
    }

    #[test]
    fn test_sticky_without_fixed_header_reserves_nothing() {
        let config =
            TableConfig::from_json(r#"{"sticky": {"offsetScroll": 8}, "fixHeader": false}"#)
                .unwrap();
        assert_eq!(config.scrollbar_reservation(), 0.0);
        assert_eq!(config.horizontal_scrollbar_bottom(), Some(8.0));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            TableConfig::from_json(r#"{"itemHeight": 0}"#),
            Err(VtableError::InvalidConfig(_))
        ));
        assert!(matches!(
            TableConfig::from_json(r#"{"scrollbarSize": -1}"#),
            Err(VtableError::InvalidConfig(_))
        ));
        assert!(matches!(
            TableConfig::from_json("not json"),
            Err(VtableError::Json(_))
        ));
    }
}
