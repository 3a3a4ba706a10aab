//! The snapping core: per-window layout state and the transition engine
//! driving it. All window manipulation goes through the injected
//! [`WindowServer`], so the engine itself never touches the OS.

use thiserror::Error;
use tracing::{debug, warn};

use crate::common::collections::HashMap;
use crate::common::config::Config;
use crate::layout::catalog::{Direction, Layout};
use crate::layout::geometry::resolve_bounds;
use crate::sys::display::{Display, display_containing};
use crate::sys::window::{StateAction, WindowId, WindowServer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapError {
    #[error("no display found for window {0}")]
    NoDisplayFound(WindowId),
}

/// Decides the layout a snap in `direction` moves to. Total: the eight
/// refinement rules are consulted first, everything else lands on the
/// direction's default half split.
pub fn next_layout(current: Layout, direction: Direction) -> Layout {
    current
        .refined(direction)
        .unwrap_or_else(|| direction.default_layout())
}

/// Last-applied layout per window, stored as an index into the canonical
/// order. Process-lifetime cache: entries for closed windows are harmless
/// garbage and are never evicted.
#[derive(Debug, Default)]
pub struct WindowStateTracker {
    last_applied: HashMap<WindowId, usize>,
}

impl WindowStateTracker {
    pub fn get(&self, id: &WindowId) -> Option<usize> { self.last_applied.get(id).copied() }

    pub fn set(&mut self, id: WindowId, layout_index: usize) {
        self.last_applied.insert(id, layout_index);
    }
}

pub struct Snapper<W> {
    winsys: W,
    tracker: WindowStateTracker,
}

impl<W: WindowServer> Snapper<W> {
    pub fn new(winsys: W) -> Self {
        Self {
            winsys,
            tracker: WindowStateTracker::default(),
        }
    }

    /// Applies `layout` to the window, recording it as the window's current
    /// layout *before* any actuation. The recording deliberately survives a
    /// failed display lookup, so the next directional snap still refines
    /// from the layout the user asked for; only an empty window id turns the
    /// whole call into a no-op.
    ///
    /// Returns the applied layout, or `None` when the request was a no-op.
    pub async fn apply_layout(
        &mut self,
        layout: Layout,
        window_id: &WindowId,
        config: &Config,
    ) -> Result<Option<Layout>, SnapError> {
        if window_id.is_empty() {
            return Ok(None);
        }
        debug!(%layout, %window_id, "applying layout");

        self.tracker.set(window_id.clone(), layout.canonical_index());

        match layout {
            Layout::FullScreen => {
                self.winsys
                    .set_window_state(window_id, StateAction::Add, "fullscreen")
                    .await;
            }
            Layout::Maximized => {
                self.winsys
                    .set_window_state(window_id, StateAction::Remove, "fullscreen")
                    .await;
                self.winsys
                    .set_window_state(window_id, StateAction::Add, "maximized_vert,maximized_horz")
                    .await;
            }
            _ => {
                let Some(display) = self.display_for(window_id).await else {
                    return Err(SnapError::NoDisplayFound(window_id.clone()));
                };
                let Some(geom) = layout.geometry() else {
                    return Ok(None);
                };
                let bounds = resolve_bounds(geom, &display, &config.margins);

                self.winsys
                    .set_window_state(
                        window_id,
                        StateAction::Remove,
                        "fullscreen,maximized_vert,maximized_horz",
                    )
                    .await;
                self.winsys
                    .resize_window(window_id, bounds.width, bounds.height)
                    .await;
                self.winsys.move_window(window_id, bounds.left, bounds.top).await;
            }
        }

        Ok(Some(layout))
    }

    /// Applies a layout by display name. Names outside the catalog record
    /// the first catalog entry for the window and skip actuation entirely.
    pub async fn apply_named(
        &mut self,
        name: &str,
        window_id: &WindowId,
        config: &Config,
    ) -> Result<Option<Layout>, SnapError> {
        match Layout::from_name(name) {
            Some(layout) => self.apply_layout(layout, window_id, config).await,
            None => {
                if window_id.is_empty() {
                    return Ok(None);
                }
                warn!(name, "unknown layout name; recording first catalog entry");
                self.tracker.set(window_id.clone(), 0);
                Ok(None)
            }
        }
    }

    /// Applies `layout` to the focused window, if any.
    pub async fn apply_to_focused(
        &mut self,
        layout: Layout,
        config: &Config,
    ) -> Result<Option<Layout>, SnapError> {
        let Some(window_id) = self.winsys.focused_window().await else {
            return Ok(None);
        };
        self.apply_layout(layout, &window_id, config).await
    }

    /// Advances the focused window's layout in `direction`: a window with no
    /// recorded state counts as maximized, so its first snap lands on the
    /// direction's half split.
    pub async fn modify_layout(
        &mut self,
        direction: Direction,
        config: &Config,
    ) -> Result<Option<Layout>, SnapError> {
        let Some(window_id) = self.winsys.focused_window().await else {
            return Ok(None);
        };

        let current = self
            .tracker
            .get(&window_id)
            .and_then(Layout::from_canonical_index)
            .unwrap_or(Layout::Maximized);
        let next = next_layout(current, direction);
        debug!(%current, %direction, %next, "resolved transition");

        self.apply_layout(next, &window_id, config).await
    }

    /// The display the window lives on: the one containing its top-left
    /// corner, else the first enumerated display. `None` only when no
    /// displays are connected at all.
    async fn display_for(&self, window_id: &WindowId) -> Option<Display> {
        let displays = self.winsys.displays().await;
        if let Some(position) = self.winsys.window_position(window_id).await {
            if let Some(disp) = display_containing(position, &displays) {
                debug!(%window_id, display = ?disp, "window is on display");
                return Some(*disp);
            }
        }
        displays.first().copied()
    }
}
