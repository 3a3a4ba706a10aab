//! Global hotkey registration backed by a `livesplit-hotkey` hook. Creation
//! failure degrades to a warning with hotkeys disabled rather than taking
//! the daemon down.

use livesplit_hotkey::{Hook, Hotkey};
use tracing::{error, warn};

use crate::actor::engine::{self, Command, Event};

pub struct HotkeyManager {
    hook: Option<Hook>,
    events_tx: engine::Sender,
}

impl HotkeyManager {
    pub fn new(events_tx: engine::Sender) -> Self {
        match Hook::new() {
            Ok(hook) => HotkeyManager {
                hook: Some(hook),
                events_tx,
            },
            Err(e) => {
                error!("failed to create global hotkey hook: {e:?}; hotkeys will be disabled");
                HotkeyManager {
                    hook: None,
                    events_tx,
                }
            }
        }
    }

    /// Binds `hotkey` to enqueue `cmd` on the engine channel. The callback
    /// runs on the hook's own thread; it only ever sends.
    pub fn register(&self, hotkey: Hotkey, cmd: Command) {
        let Some(hook) = &self.hook else {
            warn!("hotkey hook not initialized; ignoring registration for {hotkey:?}");
            return;
        };
        let events_tx = self.events_tx.clone();
        let result = hook.register(hotkey, move || {
            events_tx.send(Event::Command(cmd.clone()));
        });
        if let Err(e) = result {
            warn!("could not register hotkey {hotkey:?}: {e:?}");
        }
    }
}
