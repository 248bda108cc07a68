//! Palette and response types for the rotation service.

use serde::{Deserialize, Serialize};

/// The 15-color palette served when no other palette is configured.
///
/// `#FF5733` appears at positions 0 and 13. Both positions feed the same
/// visit-count row.
pub const DEFAULT_PALETTE: [&str; 15] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A1", "#A133FF",
    "#33FFA1", "#FF8C33", "#33FFF6", "#F6FF33", "#8C33FF",
    "#FF338C", "#33A1FF", "#57FF33", "#FF5733", "#FF33F6",
];

/// Fixed, ordered list of colors served in rotation.
///
/// Duplicates are preserved: the palette length (and therefore the cursor
/// modulus) counts every entry, while [`Palette::distinct`] yields each value
/// once for seeding the visit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build a palette from an ordered list of colors.
    ///
    /// Returns `None` for an empty list, since an empty palette has no valid
    /// cursor position.
    pub fn new<I, S>(colors: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return None;
        }
        Some(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping indices that fall outside the palette.
    pub fn color_at(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    /// Index following `index`, wrapping at the end of the palette.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.colors.len()
    }

    /// Each color value once, in first-seen order.
    pub fn distinct(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.colors.len());
        for color in &self.colors {
            if !seen.contains(&color.as_str()) {
                seen.push(color.as_str());
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One row of the visit-count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCount {
    pub color: String,
    pub count: u64,
}

impl ColorCount {
    pub fn new(color: impl Into<String>, count: u64) -> Self {
        Self {
            color: color.into(),
            count,
        }
    }
}

/// Body of a successful `GET /random-color`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rotation {
    /// The color served by this request.
    pub current_color: String,
    /// Full visit table, including this request's increment.
    pub visitor_counts: Vec<ColorCount>,
}

/// Body of a successful `GET /color-stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStats {
    pub colors: Vec<ColorCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_keeps_duplicate() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 15);
        assert_eq!(palette.color_at(0), palette.color_at(13));
        assert_eq!(palette.distinct().len(), 14);
    }

    #[test]
    fn test_distinct_preserves_first_seen_order() {
        let palette = Palette::new(["#000", "#111", "#000", "#222"]).unwrap();
        assert_eq!(palette.distinct(), vec!["#000", "#111", "#222"]);
    }

    #[test]
    fn test_index_wraps() {
        let palette = Palette::new(["#FF5733", "#33FF57"]).unwrap();
        assert_eq!(palette.next_index(0), 1);
        assert_eq!(palette.next_index(1), 0);
        assert_eq!(palette.color_at(5), "#33FF57");
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(Palette::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_rotation_serializes_camel_case() {
        let rotation = Rotation {
            current_color: "#FF5733".into(),
            visitor_counts: vec![ColorCount::new("#FF5733", 1)],
        };
        let json = serde_json::to_value(&rotation).unwrap();
        assert_eq!(json["currentColor"], "#FF5733");
        assert_eq!(json["visitorCounts"][0]["color"], "#FF5733");
        assert_eq!(json["visitorCounts"][0]["count"], 1);
    }
}
