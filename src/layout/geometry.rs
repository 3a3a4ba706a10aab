//! Converts a normalized layout rectangle into absolute pixel bounds on a
//! display, honoring the configured margins.

use crate::common::config::Margins;
use crate::layout::catalog::LayoutRect;
use crate::sys::display::Display;

/// Absolute window bounds in virtual-desktop pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Resolves `geom` against a display.
///
/// Screen margins are removed from the usable area once; window margins
/// shrink the window and inset it from the top-left. The bottom/right edges
/// get no additional per-window inset, so adjacent cells share their seam.
/// Sizes are not clamped: margins larger than the target cell produce a
/// zero or negative size that is passed through to the actuator as-is.
pub fn resolve_bounds(geom: LayoutRect, display: &Display, margins: &Margins) -> Bounds {
    let usable_w = (display.width - margins.screen_right) as f64;
    let usable_h = (display.height - margins.screen_bottom) as f64;

    Bounds {
        width: (usable_w * geom.w).floor() as i32 - margins.window_left,
        height: (usable_h * geom.h).floor() as i32 - margins.window_top,
        left: display.offset_left + (usable_w * geom.x).floor() as i32 + margins.window_left,
        top: display.offset_top + (usable_h * geom.y).floor() as i32 + margins.window_top,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::Layout;

    fn display(offset_left: i32, offset_top: i32, width: i32, height: i32) -> Display {
        Display {
            offset_left,
            offset_top,
            width,
            height,
        }
    }

    #[test]
    fn half_left_with_zero_margins_covers_the_left_half() {
        let bounds = resolve_bounds(
            Layout::HalfLeft.geometry().unwrap(),
            &display(0, 0, 1920, 1080),
            &Margins::zero(),
        );
        assert_eq!(bounds, Bounds {
            left: 0,
            top: 0,
            width: 960,
            height: 1080,
        });
    }

    #[test]
    fn third_center_on_a_full_hd_display() {
        let bounds = resolve_bounds(
            Layout::ThirdCenter.geometry().unwrap(),
            &display(0, 0, 1920, 1080),
            &Margins::default(),
        );
        // usable width is 1890; the center column starts one third in.
        assert_eq!(bounds, Bounds {
            left: 660,
            top: 30,
            width: 600,
            height: 1020,
        });
    }

    #[test]
    fn display_offset_shifts_the_result() {
        let bounds = resolve_bounds(
            Layout::HalfTop.geometry().unwrap(),
            &display(1920, 0, 1280, 1024),
            &Margins::zero(),
        );
        assert_eq!(bounds, Bounds {
            left: 1920,
            top: 0,
            width: 1280,
            height: 512,
        });
    }

    #[test]
    fn margins_inset_from_the_top_left_only() {
        let margins = Margins {
            window_top: 10,
            window_left: 20,
            screen_bottom: 40,
            screen_right: 80,
        };
        let bounds = resolve_bounds(
            Layout::AlmostMaximized.geometry().unwrap(),
            &display(0, 0, 1000, 800),
            &margins,
        );
        // The window shrinks by the window margins and is pushed away from
        // the top-left; the screen margins only reduce the usable area.
        assert_eq!(bounds, Bounds {
            left: 20,
            top: 10,
            width: 900,
            height: 750,
        });
    }

    #[test]
    fn resolution_is_pure() {
        let geom = Layout::QuarterBottomRight.geometry().unwrap();
        let display = display(0, 0, 2560, 1440);
        let margins = Margins::default();
        assert_eq!(
            resolve_bounds(geom, &display, &margins),
            resolve_bounds(geom, &display, &margins)
        );
    }

    #[test]
    fn oversized_margins_are_not_clamped() {
        let margins = Margins {
            window_top: 500,
            window_left: 500,
            screen_bottom: 0,
            screen_right: 0,
        };
        let bounds = resolve_bounds(
            Layout::NinthTopLeft.geometry().unwrap(),
            &display(0, 0, 900, 900),
            &margins,
        );
        assert_eq!(bounds.width, -200);
        assert_eq!(bounds.height, -200);
    }
}
