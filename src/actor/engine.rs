//! The engine worker owns the snapping core, the parsed configuration and
//! the hotkey registrations. Hotkey callbacks, the config watcher and the
//! Ctrl-C handler only enqueue events; this worker consumes them one at a
//! time, so per-window state needs no locking.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::actor;
use crate::common::config::{Config, config_file};
use crate::layout::{Direction, Layout, SnapError, Snapper};
use crate::sys::hotkey::HotkeyManager;
use crate::sys::notify::Notifier;
use crate::sys::window::WindowServer;

pub type Sender = actor::Sender<Event>;

pub type Receiver = actor::Receiver<Event>;

#[derive(Debug)]
pub enum Event {
    Command(Command),
    Shutdown,
}

/// Commands that can be bound to hotkeys or issued from the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Snap the focused window in a direction, refining its current layout.
    Snap(Direction),
    /// Apply a named layout to the focused window.
    Apply(Layout),
    /// Re-read the configuration file.
    ReloadConfig,
}

pub struct Engine<W: WindowServer> {
    config: Config,
    snapper: Snapper<W>,
    notifier: Notifier,
    hotkeys: Option<HotkeyManager>,
    receiver: Receiver,
    sender: Sender,
}

impl<W: WindowServer> Engine<W> {
    pub fn new(config: Config, winsys: W, notifier: Notifier) -> (Self, Sender) {
        let (sender, receiver) = actor::channel();
        let this = Self {
            config,
            snapper: Snapper::new(winsys),
            notifier,
            hotkeys: None,
            receiver,
            sender: sender.clone(),
        };
        (this, sender)
    }

    pub async fn run(mut self) {
        self.register_hotkeys();
        while let Some((span, event)) = self.receiver.recv().await {
            let _guard = span.enter();
            match event {
                Event::Shutdown => {
                    info!("shutting down");
                    break;
                }
                Event::Command(cmd) => self.handle_command(cmd).await,
            }
        }
    }

    #[instrument(name = "engine::handle_command", skip(self))]
    async fn handle_command(&mut self, cmd: Command) {
        debug!("handle_command");
        match cmd {
            Command::Snap(direction) => {
                let result = self.snapper.modify_layout(direction, &self.config).await;
                self.report(result);
            }
            Command::Apply(layout) => {
                let result = self.snapper.apply_to_focused(layout, &self.config).await;
                self.report(result);
            }
            Command::ReloadConfig => self.reload_config(),
        }
    }

    fn report(&self, result: Result<Option<Layout>, SnapError>) {
        match result {
            Ok(Some(layout)) => {
                if self.config.notify_on_apply_layout {
                    self.notifier.send(&layout.to_string(), "");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!("{err}");
                self.notifier.send("Layout error", &err.to_string());
            }
        }
    }

    fn reload_config(&mut self) {
        let path = config_file();
        let new_config = match Config::read(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("failed to reload {path:?}: {err:#}");
                self.notifier.send_error(
                    "Invalid configuration",
                    &format!("Using default config. Error in {}: {err}", path.display()),
                );
                Config::default()
            }
        };

        let keys_changed = new_config.keys != self.config.keys;
        self.config = new_config;

        if keys_changed {
            debug!("hotkey bindings changed; reloading hotkeys");
            self.register_hotkeys();
        } else {
            debug!("hotkey bindings unchanged; skipping reload");
        }

        info!("configuration reloaded");
        self.notifier.send("Configuration reloaded", "");
    }

    fn register_hotkeys(&mut self) {
        debug!("register_hotkeys");
        if self.hotkeys.is_some() {
            debug!("hotkeys already registered; dropping existing hook before re-creating");
            self.hotkeys = None;
        }

        let mgr = HotkeyManager::new(self.sender.clone());
        for (key, cmd) in &self.config.keys {
            mgr.register(key.clone(), cmd.clone());
        }
        self.hotkeys = Some(mgr);
    }
}
