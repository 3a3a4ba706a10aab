//! The actuator seam: a narrow interface to whatever can query and move
//! windows on the host, and the production implementation backed by
//! `xdotool`/`xrandr`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::sys::command::{SysError, run_command};
use crate::sys::display::{Display, parse_xrandr};
use crate::sys::notify::Notifier;

/// Opaque window handle as reported by the OS layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self { WindowId(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Add,
    Remove,
}

impl StateAction {
    pub fn flag(self) -> &'static str {
        match self {
            StateAction::Add => "--add",
            StateAction::Remove => "--remove",
        }
    }
}

/// What the snapping core needs from the host's window tooling. Every
/// operation may fail silently; failure means "skip this step, keep going".
#[allow(async_fn_in_trait)]
pub trait WindowServer {
    async fn focused_window(&self) -> Option<WindowId>;
    /// Top-left position of a window, negative coordinates clamped to 0.
    async fn window_position(&self, id: &WindowId) -> Option<(i32, i32)>;
    /// Connected displays in enumeration order (first is the fallback).
    async fn displays(&self) -> Vec<Display>;
    async fn set_window_state(&self, id: &WindowId, action: StateAction, properties: &str);
    async fn resize_window(&self, id: &WindowId, width: i32, height: i32);
    async fn move_window(&self, id: &WindowId, left: i32, top: i32);
}

static POSITION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Position: (-?\d+),(-?\d+)").unwrap());

fn parse_position(output: &str) -> Option<(i32, i32)> {
    let caps = POSITION_LINE.captures(output)?;
    let left: i32 = caps[1].parse().ok()?;
    let top: i32 = caps[2].parse().ok()?;
    Some((left.max(0), top.max(0)))
}

/// Production actuator shelling out to `xdotool` and `xrandr`.
pub struct XdoServer {
    notifier: Notifier,
}

impl XdoServer {
    pub fn new(notifier: Notifier) -> Self { XdoServer { notifier } }

    /// Runs a tool, degrading every failure to an empty result. A missing or
    /// hanging tool additionally notifies the user so a broken install is
    /// not silent.
    async fn run(&self, program: &str, args: &[&str]) -> String {
        match run_command(program, args).await {
            Ok(output) => output,
            Err(err @ (SysError::ToolMissing(_) | SysError::ToolTimedOut { .. })) => {
                self.notifier.send_error(
                    &format!("Error: command `{program}` not available."),
                    "Please ensure it is installed and in your PATH.",
                );
                debug!("{err}");
                String::new()
            }
            Err(err) => {
                debug!("{err}");
                String::new()
            }
        }
    }
}

impl WindowServer for XdoServer {
    async fn focused_window(&self) -> Option<WindowId> {
        let output = self.run("xdotool", &["getwindowfocus"]).await;
        (!output.is_empty()).then(|| WindowId::new(output))
    }

    async fn window_position(&self, id: &WindowId) -> Option<(i32, i32)> {
        let output = self.run("xdotool", &["getwindowgeometry", id.as_str()]).await;
        parse_position(&output)
    }

    async fn displays(&self) -> Vec<Display> { parse_xrandr(&self.run("xrandr", &[]).await) }

    async fn set_window_state(&self, id: &WindowId, action: StateAction, properties: &str) {
        self.run("xdotool", &["windowstate", action.flag(), properties, id.as_str()])
            .await;
    }

    async fn resize_window(&self, id: &WindowId, width: i32, height: i32) {
        self.run(
            "xdotool",
            &["windowsize", id.as_str(), &width.to_string(), &height.to_string()],
        )
        .await;
    }

    async fn move_window(&self, id: &WindowId, left: i32, top: i32) {
        self.run(
            "xdotool",
            &["windowmove", id.as_str(), &left.to_string(), &top.to_string()],
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const GEOMETRY_OUTPUT: &str = "\
Window 58720263 (focal point)
  Position: 1925,37 (screen: 0)
  Geometry: 1910x1003
";

    #[test]
    fn position_parses_from_geometry_output() {
        assert_eq!(parse_position(GEOMETRY_OUTPUT), Some((1925, 37)));
    }

    #[test]
    fn negative_positions_clamp_to_zero() {
        assert_eq!(parse_position("  Position: -4,-28 (screen: 0)"), Some((0, 0)));
    }

    #[test]
    fn garbage_yields_no_position() {
        assert_eq!(parse_position(""), None);
        assert_eq!(parse_position("Geometry: 1910x1003"), None);
    }
}
