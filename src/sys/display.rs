//! Connected display geometry in virtual-desktop coordinates, parsed from
//! `xrandr` output.

use once_cell::sync::Lazy;
use regex::Regex;

static MODE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" connected(?: primary)? (\d+)x(\d+)\+(\d+)\+(\d+)").unwrap());

/// One monitor's rectangle. Displays are non-overlapping; enumeration order
/// is the `xrandr` output order and the first entry doubles as the fallback
/// when a window cannot be located on any display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    pub offset_left: i32,
    pub offset_top: i32,
    pub width: i32,
    pub height: i32,
}

impl Display {
    pub fn x_end(&self) -> i32 { self.offset_left + self.width }

    pub fn y_end(&self) -> i32 { self.offset_top + self.height }

    /// Half-open containment: a point on the right/bottom edge belongs to
    /// the neighboring display.
    pub fn contains(&self, (x, y): (i32, i32)) -> bool {
        self.offset_left <= x && x < self.x_end() && self.offset_top <= y && y < self.y_end()
    }
}

/// First display (in enumeration order) containing `point`.
pub fn display_containing(point: (i32, i32), displays: &[Display]) -> Option<&Display> {
    displays.iter().find(|display| display.contains(point))
}

pub fn parse_xrandr(output: &str) -> Vec<Display> {
    output
        .lines()
        .filter_map(|line| {
            let caps = MODE_LINE.captures(line)?;
            let field = |i: usize| caps[i].parse::<i32>().ok();
            Some(Display {
                width: field(1)?,
                height: field(2)?,
                offset_left: field(3)?,
                offset_top: field(4)?,
            })
        })
        .collect()
}
