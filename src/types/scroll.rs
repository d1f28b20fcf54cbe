use serde::{Deserialize, Serialize};

use super::RowKey;
use crate::error::VtableError;

/// Where the target row lands inside the viewport after `scroll_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlign {
    Top,
    Bottom,
    /// Minimal movement: only scroll if the row is outside the viewport
    #[default]
    Auto,
}

/// Addressing mode of a scroll request. The modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// Absolute vertical position in pixels
    Top(f32),
    Index { index: usize, offset: Option<f32> },
    Key { key: RowKey, offset: Option<f32> },
}

impl ScrollTarget {
    pub fn offset(&self) -> Option<f32> {
        match self {
            Self::Top(_) => None,
            Self::Index { offset, .. } | Self::Key { offset, .. } => *offset,
        }
    }
}

/// A vertical scroll request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawScrollConfig")]
pub struct ScrollConfig {
    pub target: ScrollTarget,
    pub align: Option<ScrollAlign>,
}

impl ScrollConfig {
    pub fn top(top: f32) -> Self {
        Self {
            target: ScrollTarget::Top(top),
            align: None,
        }
    }

    pub fn index(index: usize) -> Self {
        Self {
            target: ScrollTarget::Index {
                index,
                offset: None,
            },
            align: None,
        }
    }

    pub fn key(key: impl Into<RowKey>) -> Self {
        Self {
            target: ScrollTarget::Key {
                key: key.into(),
                offset: None,
            },
            align: None,
        }
    }

    /// Extra pixel offset for index/key targets. Ignored for `Top`.
    #[must_use]
    pub fn with_offset(mut self, px: f32) -> Self {
        match &mut self.target {
            ScrollTarget::Top(_) => {}
            ScrollTarget::Index { offset, .. } | ScrollTarget::Key { offset, .. } => {
                *offset = Some(px);
            }
        }
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: ScrollAlign) -> Self {
        self.align = Some(align);
        self
    }

    /// Alignment actually used: an explicit offset always aligns to the top.
    pub fn effective_align(&self) -> ScrollAlign {
        if self.target.offset().is_some() {
            ScrollAlign::Top
        } else {
            self.align.unwrap_or_default()
        }
    }
}

/// Wire shape of a scroll request: `{ top?, index?, key?, offset?, align? }`.
#[derive(Deserialize)]
struct RawScrollConfig {
    top: Option<f32>,
    index: Option<usize>,
    key: Option<RowKey>,
    offset: Option<f32>,
    align: Option<ScrollAlign>,
}

impl TryFrom<RawScrollConfig> for ScrollConfig {
    type Error = VtableError;

    fn try_from(raw: RawScrollConfig) -> Result<Self, Self::Error> {
        let target = match (raw.top, raw.index, raw.key) {
            (Some(top), None, None) => ScrollTarget::Top(top),
            (None, Some(index), None) => ScrollTarget::Index {
                index,
                offset: raw.offset,
            },
            (None, None, Some(key)) => ScrollTarget::Key {
                key,
                offset: raw.offset,
            },
            (None, None, None) => {
                return Err(VtableError::InvalidScrollConfig(
                    "one of `top`, `index` or `key` is required".to_string(),
                ))
            }
            _ => {
                return Err(VtableError::InvalidScrollConfig(
                    "`top`, `index` and `key` are mutually exclusive".to_string(),
                ))
            }
        };
        Ok(Self {
            target,
            align: raw.align,
        })
    }
}

/// Pixel extent of a row range, relative to the top of the content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeInfo {
    pub top: f32,
    pub bottom: f32,
}

impl SizeInfo {
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }
}

/// A horizontally scrolling surface of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSource {
    Header,
    Body,
    Summary,
}

impl ScrollSource {
    pub const ALL: [Self; 3] = [Self::Header, Self::Body, Self::Summary];
}

/// A resolved horizontal scroll change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEvent {
    pub scroll_left: f32,
    /// Surface that produced the change
    pub source: ScrollSource,
    /// Surfaces that must be moved to `scroll_left`
    pub targets: Vec<ScrollSource>,
}

/// Whether content is scrolled underneath the fixed columns on each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PingState {
    pub start: bool,
    pub end: bool,
}
