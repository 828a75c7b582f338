//! Lane coloring.
//!
//! Color is a pure function of the lane index, never an identity property of
//! a commit: the same lane always gets the same color within and across
//! layout passes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Minimum number of distinct colors a palette must hold.
pub const MIN_PALETTE_LEN: usize = 8;

const DEFAULT_COLORS: [&str; MIN_PALETTE_LEN] = [
    "#4f8ff7", "#e5534b", "#57ab5a", "#c69026", "#986ee2", "#39c5cf", "#e0823d", "#d36ba6",
];

/// Fixed, ordered list of lane colors.
///
/// Always holds at least [`MIN_PALETTE_LEN`] distinct, non-empty entries, so
/// [`Palette::color`] can never divide by zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build a palette, rejecting lists that are too short or repeat colors.
    ///
    /// Surrounding whitespace is stripped from every entry.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidPalette`] if fewer than
    /// [`MIN_PALETTE_LEN`] distinct non-empty colors are given or if any
    /// entry is empty or repeated.
    pub fn new(colors: Vec<String>) -> Result<Self, LayoutError> {
        let colors: Vec<String> = colors.into_iter().map(|c| c.trim().to_string()).collect();
        let distinct: HashSet<&str> = colors
            .iter()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .collect();
        if distinct.len() < MIN_PALETTE_LEN || distinct.len() != colors.len() {
            return Err(LayoutError::InvalidPalette {
                min: MIN_PALETTE_LEN,
                got: distinct.len(),
            });
        }
        Ok(Self { colors })
    }

    /// Color for a lane: `colors[lane mod len]`.
    #[must_use]
    pub fn color(&self, lane: usize) -> &str {
        &self.colors[lane % self.colors.len()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; present for API symmetry with [`Palette::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = LayoutError;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("#{i:06x}")).collect()
    }

    #[test]
    fn default_palette_is_valid() {
        let palette = Palette::default();
        assert_eq!(palette.len(), MIN_PALETTE_LEN);
        assert!(Palette::new(palette.colors().to_vec()).is_ok());
    }

    #[test]
    fn color_wraps_modulo_length() {
        let palette = Palette::default();
        for lane in 0..palette.len() {
            assert_eq!(palette.color(lane), palette.color(lane + palette.len()));
        }
        assert_ne!(palette.color(0), palette.color(1));
    }

    #[test]
    fn color_is_pure_function_of_lane() {
        let a = Palette::default();
        let b = Palette::default();
        for lane in 0..32 {
            assert_eq!(a.color(lane), b.color(lane));
        }
    }

    #[test]
    fn rejects_short_palettes() {
        let err = Palette::new(colors(7)).expect_err("too short");
        assert!(matches!(err, LayoutError::InvalidPalette { min: 8, got: 7 }));
        assert!(Palette::new(Vec::new()).is_err());
    }

    #[test]
    fn rejects_duplicates_and_blanks() {
        let mut dup = colors(8);
        dup.push("#000000".to_string());
        assert!(Palette::new(dup).is_err());

        let mut blank = colors(8);
        blank.push("  ".to_string());
        assert!(Palette::new(blank).is_err());
    }

    #[test]
    fn stores_trimmed_colors() {
        let mut padded = colors(8);
        padded[0] = " #fff".to_string();
        padded[1] = "#eee\t".to_string();
        let palette = Palette::new(padded).expect("valid palette");
        assert_eq!(palette.color(0), "#fff");
        assert_eq!(palette.color(1), "#eee");
        assert!(palette.colors().iter().all(|c| c.trim() == c));
    }

    #[test]
    fn whitespace_variants_count_as_duplicates() {
        let mut dup = colors(8);
        dup.push(" #000000 ".to_string());
        assert!(Palette::new(dup).is_err());
    }

    #[test]
    fn accepts_larger_palettes() {
        let palette = Palette::new(colors(12)).expect("valid palette");
        assert_eq!(palette.color(11), "#00000b");
        assert_eq!(palette.color(12), "#000000");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Palette, _> = serde_json::from_value(serde_json::json!(colors(8)));
        assert!(ok.is_ok());
        let bad: Result<Palette, _> = serde_json::from_value(serde_json::json!(["#fff"]));
        assert!(bad.is_err());
    }
}
