use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::actor::engine::{self, Command};
use crate::common::config;

/// Watches the configuration file and enqueues a reload command whenever its
/// contents change. Runs on its own thread; polling keeps it working on
/// filesystems where inotify is unavailable.
pub struct ConfigWatcher {
    file: PathBuf,
    events_tx: engine::Sender,
}

impl ConfigWatcher {
    pub fn spawn(events_tx: engine::Sender) {
        thread::Builder::new()
            .name("config-watcher".to_string())
            .spawn(move || {
                let actor = ConfigWatcher {
                    file: config::config_file(),
                    events_tx,
                };
                if let Err(e) = actor.run() {
                    warn!("config-watcher: error: {e:?}");
                }
            })
            .expect("failed to spawn config-watcher thread");
    }

    fn run(self) -> notify::Result<()> {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();

        let mut watcher = PollWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            NotifyConfig::default()
                .with_poll_interval(Duration::from_secs(1))
                .with_compare_contents(true),
        )?;

        watcher.watch(&self.file, RecursiveMode::NonRecursive)?;

        info!("watching {:?}", self.file);

        for res in rx {
            match res {
                Ok(event) => {
                    if self.is_relevant(&event) {
                        debug!("change detected: {:?}", event.kind);
                        self.request_reload();
                    } else {
                        debug!("ignoring unrelated event: {:?}", event.kind);
                    }
                }
                Err(e) => {
                    warn!("watch error: {e:?}");
                }
            }
        }

        warn!("channel closed, exiting");
        Ok(())
    }

    fn is_relevant(&self, event: &Event) -> bool {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => event
                .paths
                .iter()
                .any(|p| p == &self.file || p.file_name() == self.file.file_name()),
            _ => false,
        }
    }

    fn request_reload(&self) {
        info!("requesting config reload");
        self.events_tx.send(engine::Event::Command(Command::ReloadConfig));
    }
}
