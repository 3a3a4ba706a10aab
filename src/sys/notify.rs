//! Desktop notifications via `notify-send`. Notification failure is never an
//! error; a desktop without a notification daemon just gets log lines.

use tracing::debug;

const NOTIFY_EXPIRE_MS: u32 = 2000;
const ERROR_EXPIRE_MS: u32 = 10000;
const ICON: &str = "preferences-desktop-display";
const APP_NAME: &str = "xsnap";

#[derive(Clone, Default)]
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self { Notifier }

    pub fn send(&self, summary: &str, description: &str) {
        self.send_with_expiry(summary, description, NOTIFY_EXPIRE_MS);
    }

    /// Error notifications linger longer so the user can read the remedy.
    pub fn send_error(&self, summary: &str, description: &str) {
        self.send_with_expiry(summary, description, ERROR_EXPIRE_MS);
    }

    pub fn send_with_expiry(&self, summary: &str, description: &str, expire_ms: u32) {
        let summary = summary.to_string();
        let description = description.to_string();
        std::thread::spawn(move || {
            let output = std::process::Command::new("notify-send")
                .args(["--icon", ICON, "--app-name", APP_NAME])
                .args(["--expire-time", &expire_ms.to_string()])
                .arg(&summary)
                .arg(&description)
                .output();
            match output {
                Ok(output) if !output.status.success() => {
                    debug!(
                        "notify-send exited with {}: {summary}",
                        output.status
                    );
                }
                Err(e) => debug!("notification failed: {e}\nsummary: {summary}"),
                Ok(_) => {}
            }
        });
    }
}
