use serde::{Deserialize, Deserializer, Serialize};

/// Edge a fixed column is pinned to.
///
/// `Start`/`End` are logical; the physical side depends on [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    Start,
    End,
}

impl FixedSide {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" | "left" => Some(Self::Start),
            "end" | "right" => Some(Self::End),
            _ => None,
        }
    }
}

/// Accepts `"start"`, `"end"`, the legacy `"left"`/`"right"`, and `true`
/// (pinned to start). `false`, `null` and unknown strings mean "not fixed".
fn deserialize_fixed<'de, D>(deserializer: D) -> Result<Option<FixedSide>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFixed {
        Flag(bool),
        Name(String),
    }

    Ok(
        match Option::<RawFixed>::deserialize(deserializer)? {
            Some(RawFixed::Flag(true)) => Some(FixedSide::Start),
            Some(RawFixed::Name(name)) => FixedSide::from_name(&name),
            Some(RawFixed::Flag(false)) | None => None,
        },
    )
}

/// Text direction of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Physical viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalSide {
    Left,
    Right,
}

impl Direction {
    /// Physical edge a logical fixed side maps to.
    pub fn physical_side(self, side: FixedSide) -> PhysicalSide {
        match (self, side) {
            (Self::Ltr, FixedSide::Start) | (Self::Rtl, FixedSide::End) => PhysicalSide::Left,
            (Self::Ltr, FixedSide::End) | (Self::Rtl, FixedSide::Start) => PhysicalSide::Right,
        }
    }

    /// Valid horizontal scroll range for a given overflow.
    ///
    /// Right-to-left scroll positions are non-positive.
    pub fn scroll_range(self, max_scroll: f32) -> (f32, f32) {
        let max_scroll = max_scroll.max(0.0);
        match self {
            Self::Ltr => (0.0, max_scroll),
            Self::Rtl => (-max_scroll, 0.0),
        }
    }

    /// Clamp a horizontal scroll position into the direction's valid range.
    pub fn clamp_scroll_left(self, scroll_left: f32, max_scroll: f32) -> f32 {
        let (min, max) = self.scroll_range(max_scroll);
        if scroll_left.is_nan() {
            return 0.0;
        }
        scroll_left.clamp(min, max)
    }
}

/// Column metadata consumed by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub key: String,
    /// Pixel width; `None` disables the fixed layout for the pass
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_fixed")]
    pub fixed: Option<FixedSide>,
    /// Record field holding this column's row span (JSON-backed tables)
    #[serde(default)]
    pub row_span_field: Option<String>,
}

impl ColumnDescriptor {
    /// A non-fixed column.
    pub fn new(key: impl Into<String>, width: Option<f32>) -> Self {
        Self {
            key: key.into(),
            width,
            fixed: None,
            row_span_field: None,
        }
    }

    /// Pin the column to an edge.
    #[must_use]
    pub fn fixed(mut self, side: FixedSide) -> Self {
        self.fixed = Some(side);
        self
    }

    /// Read row spans from the named record field.
    #[must_use]
    pub fn with_row_span_field(mut self, field: impl Into<String>) -> Self {
        self.row_span_field = Some(field.into());
        self
    }

    /// Width if it is usable for fixed layout (finite and non-negative).
    pub fn usable_width(&self) -> Option<f32> {
        self.width.filter(|w| w.is_finite() && *w >= 0.0)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_spellings() {
        let cols: Vec<ColumnDescriptor> = serde_json::from_str(
            r#"[
                {"key": "a", "width": 10, "fixed": "left"},
                {"key": "b", "width": 10, "fixed": true},
                {"key": "c", "width": 10, "fixed": "end"},
                {"key": "d", "width": 10, "fixed": false},
                {"key": "e"}
            ]"#,
        )
        .unwrap();

        assert_eq!(cols[0].fixed, Some(FixedSide::Start));
        assert_eq!(cols[1].fixed, Some(FixedSide::Start));
        assert_eq!(cols[2].fixed, Some(FixedSide::End));
        assert_eq!(cols[3].fixed, None);
        assert_eq!(cols[4].fixed, None);
        assert_eq!(cols[4].width, None);
    }

    #[test]
    fn test_physical_side() {
        assert_eq!(
            Direction::Ltr.physical_side(FixedSide::Start),
            PhysicalSide::Left
        );
        assert_eq!(
            Direction::Rtl.physical_side(FixedSide::Start),
            PhysicalSide::Right
        );
        assert_eq!(
            Direction::Rtl.physical_side(FixedSide::End),
            PhysicalSide::Left
        );
    }

    #[test]
    fn test_usable_width_rejects_nan() {
        assert_eq!(ColumnDescriptor::new("a", Some(f32::NAN)).usable_width(), None);
        assert_eq!(ColumnDescriptor::new("a", Some(-1.0)).usable_width(), None);
        assert_eq!(ColumnDescriptor::new("a", Some(3.0)).usable_width(), Some(3.0));
    }
}
