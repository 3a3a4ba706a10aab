//! The fixed catalog of window layouts: display names, normalized screen
//! fractions, and the transition data consumed by the engine.

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

const THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// A normalized rectangle in `[0,1]^2`: offset and size as fractions of a
/// display's usable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Snap direction. Closed set, no diagonals.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Every layout the snapper knows about. Declaration order is the canonical
/// order; per-window state stores an index into it, so variants must not be
/// reordered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    FromRepr,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum Layout {
    #[strum(serialize = "Full Screen")]
    FullScreen,
    #[strum(serialize = "Maximized")]
    Maximized,
    #[strum(serialize = "Almost Maximized")]
    AlmostMaximized,
    // Columns
    #[strum(serialize = "50% Left")]
    HalfLeft,
    #[strum(serialize = "50% Right")]
    HalfRight,
    #[strum(serialize = "66% Left")]
    TwoThirdsLeft,
    #[strum(serialize = "66% Right")]
    TwoThirdsRight,
    #[strum(serialize = "33% Left")]
    ThirdLeft,
    #[strum(serialize = "33% Center")]
    ThirdCenter,
    #[strum(serialize = "33% Right")]
    ThirdRight,
    // Rows
    #[strum(serialize = "50% Top")]
    HalfTop,
    #[strum(serialize = "50% Bottom")]
    HalfBottom,
    #[strum(serialize = "66% Top")]
    TwoThirdsTop,
    #[strum(serialize = "66% Bottom")]
    TwoThirdsBottom,
    #[strum(serialize = "33% Top")]
    ThirdTop,
    #[strum(serialize = "33% Middle")]
    ThirdMiddle,
    #[strum(serialize = "33% Bottom")]
    ThirdBottom,
    // 2x2 cells
    #[strum(serialize = "50% Top Left")]
    QuarterTopLeft,
    #[strum(serialize = "50% Bottom Left")]
    QuarterBottomLeft,
    #[strum(serialize = "50% Top Right")]
    QuarterTopRight,
    #[strum(serialize = "50% Bottom Right")]
    QuarterBottomRight,
    // 3x3 cells
    #[strum(serialize = "33% Top Left")]
    NinthTopLeft,
    #[strum(serialize = "33% Middle Left")]
    NinthMiddleLeft,
    #[strum(serialize = "33% Bottom Left")]
    NinthBottomLeft,
    #[strum(serialize = "33% Top Center")]
    NinthTopCenter,
    #[strum(serialize = "33% Middle Center")]
    NinthMiddleCenter,
    #[strum(serialize = "33% Bottom Center")]
    NinthBottomCenter,
    #[strum(serialize = "33% Top Right")]
    NinthTopRight,
    #[strum(serialize = "33% Middle Right")]
    NinthMiddleRight,
    #[strum(serialize = "33% Bottom Right")]
    NinthBottomRight,
}

impl Layout {
    /// Index of this layout in the canonical order.
    pub fn canonical_index(self) -> usize { self as usize }

    pub fn from_canonical_index(index: usize) -> Option<Layout> { Layout::from_repr(index) }

    /// Parses a display name ("50% Left"). Returns `None` for names outside
    /// the catalog; the engine decides what to do with those.
    pub fn from_name(name: &str) -> Option<Layout> { name.parse().ok() }

    /// The normalized rectangle for a fractional layout, or `None` for the
    /// two special layouts that bypass rectangle math entirely.
    pub fn geometry(self) -> Option<LayoutRect> {
        use Layout::*;
        let (x, y, w, h) = match self {
            FullScreen | Maximized => return None,
            AlmostMaximized => (0.0, 0.0, 1.0, 1.0),
            HalfLeft => (0.0, 0.0, 0.5, 1.0),
            HalfRight => (0.5, 0.0, 0.5, 1.0),
            TwoThirdsLeft => (0.0, 0.0, TWO_THIRDS, 1.0),
            TwoThirdsRight => (THIRD, 0.0, TWO_THIRDS, 1.0),
            ThirdLeft => (0.0, 0.0, THIRD, 1.0),
            ThirdCenter => (THIRD, 0.0, THIRD, 1.0),
            ThirdRight => (TWO_THIRDS, 0.0, THIRD, 1.0),
            HalfTop => (0.0, 0.0, 1.0, 0.5),
            HalfBottom => (0.0, 0.5, 1.0, 0.5),
            TwoThirdsTop => (0.0, 0.0, 1.0, TWO_THIRDS),
            TwoThirdsBottom => (0.0, THIRD, 1.0, TWO_THIRDS),
            ThirdTop => (0.0, 0.0, 1.0, THIRD),
            ThirdMiddle => (0.0, THIRD, 1.0, THIRD),
            ThirdBottom => (0.0, TWO_THIRDS, 1.0, THIRD),
            QuarterTopLeft => (0.0, 0.0, 0.5, 0.5),
            QuarterBottomLeft => (0.0, 0.5, 0.5, 0.5),
            QuarterTopRight => (0.5, 0.0, 0.5, 0.5),
            QuarterBottomRight => (0.5, 0.5, 0.5, 0.5),
            NinthTopLeft => (0.0, 0.0, THIRD, THIRD),
            NinthMiddleLeft => (0.0, THIRD, THIRD, THIRD),
            NinthBottomLeft => (0.0, TWO_THIRDS, THIRD, THIRD),
            NinthTopCenter => (THIRD, 0.0, THIRD, THIRD),
            NinthMiddleCenter => (THIRD, THIRD, THIRD, THIRD),
            NinthBottomCenter => (THIRD, TWO_THIRDS, THIRD, THIRD),
            NinthTopRight => (TWO_THIRDS, 0.0, THIRD, THIRD),
            NinthMiddleRight => (TWO_THIRDS, THIRD, THIRD, THIRD),
            NinthBottomRight => (TWO_THIRDS, TWO_THIRDS, THIRD, THIRD),
        };
        Some(LayoutRect { x, y, w, h })
    }

    /// The refinement rule for pressing `direction` while this layout is
    /// active. Only the eight 50%-split-to-corner refinements exist; every
    /// other combination falls through to the per-direction default.
    pub fn refined(self, direction: Direction) -> Option<Layout> {
        use Direction::*;
        use Layout::*;
        Some(match (self, direction) {
            (HalfLeft, Up) => QuarterTopLeft,
            (HalfLeft, Down) => QuarterBottomLeft,
            (HalfRight, Up) => QuarterTopRight,
            (HalfRight, Down) => QuarterBottomRight,
            (HalfTop, Left) => QuarterTopLeft,
            (HalfTop, Right) => QuarterTopRight,
            (HalfBottom, Left) => QuarterBottomLeft,
            (HalfBottom, Right) => QuarterBottomRight,
            _ => return None,
        })
    }
}

impl Direction {
    /// The layout a snap falls back to when no refinement rule matches.
    pub fn default_layout(self) -> Layout {
        match self {
            Direction::Left => Layout::HalfLeft,
            Direction::Right => Layout::HalfRight,
            Direction::Up => Layout::HalfTop,
            Direction::Down => Layout::HalfBottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        assert_eq!(Layout::COUNT, 30);
        assert_eq!(Layout::FullScreen.canonical_index(), 0);
        assert_eq!(Layout::Maximized.canonical_index(), 1);
        assert_eq!(Layout::HalfLeft.canonical_index(), 3);
        assert_eq!(Layout::QuarterTopLeft.canonical_index(), 17);
        assert_eq!(Layout::NinthBottomRight.canonical_index(), 29);
    }

    #[test]
    fn index_round_trips() {
        for layout in Layout::iter() {
            assert_eq!(
                Layout::from_canonical_index(layout.canonical_index()),
                Some(layout)
            );
        }
        assert_eq!(Layout::from_canonical_index(Layout::COUNT), None);
    }

    #[test]
    fn name_round_trips() {
        for layout in Layout::iter() {
            assert_eq!(Layout::from_name(&layout.to_string()), Some(layout));
        }
        assert_eq!(Layout::from_name("Cascade"), None);
    }

    #[test]
    fn display_names_match_the_menu_labels() {
        assert_eq!(Layout::FullScreen.to_string(), "Full Screen");
        assert_eq!(Layout::AlmostMaximized.to_string(), "Almost Maximized");
        assert_eq!(Layout::HalfLeft.to_string(), "50% Left");
        assert_eq!(Layout::ThirdCenter.to_string(), "33% Center");
        // The middle row is "Middle", not "Center".
        assert_eq!(Layout::ThirdMiddle.to_string(), "33% Middle");
        assert_eq!(Layout::NinthMiddleCenter.to_string(), "33% Middle Center");
    }

    #[test]
    fn specials_have_no_geometry() {
        assert_eq!(Layout::FullScreen.geometry(), None);
        assert_eq!(Layout::Maximized.geometry(), None);
        for layout in Layout::iter().skip(2) {
            assert!(layout.geometry().is_some(), "{layout} should be fractional");
        }
    }

    #[test]
    fn geometry_stays_inside_the_unit_square() {
        const EPS: f64 = 1e-9;
        for layout in Layout::iter() {
            let Some(rect) = layout.geometry() else { continue };
            assert!(rect.x >= 0.0 && rect.y >= 0.0, "{layout}");
            assert!(rect.w > 0.0 && rect.h > 0.0, "{layout}");
            assert!(rect.x + rect.w <= 1.0 + EPS, "{layout}");
            assert!(rect.y + rect.h <= 1.0 + EPS, "{layout}");
        }
    }

    #[test]
    fn all_eight_refinements_hit_their_corner() {
        use Direction::*;
        use Layout::*;
        let rules = [
            (HalfLeft, Up, QuarterTopLeft),
            (HalfLeft, Down, QuarterBottomLeft),
            (HalfRight, Up, QuarterTopRight),
            (HalfRight, Down, QuarterBottomRight),
            (HalfTop, Left, QuarterTopLeft),
            (HalfTop, Right, QuarterTopRight),
            (HalfBottom, Left, QuarterBottomLeft),
            (HalfBottom, Right, QuarterBottomRight),
        ];
        for (source, direction, target) in rules {
            assert_eq!(source.refined(direction), Some(target));
        }
    }

    #[test]
    fn only_half_splits_are_refined() {
        let mut rule_count = 0;
        for layout in Layout::iter() {
            for direction in Direction::iter() {
                if layout.refined(direction).is_some() {
                    rule_count += 1;
                }
            }
        }
        assert_eq!(rule_count, 8);
    }

    #[test]
    fn direction_strings_are_lowercase() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!("down".parse::<Direction>(), Ok(Direction::Down));
        assert!("northwest".parse::<Direction>().is_err());
    }
}
