use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::bail;
use livesplit_hotkey::Hotkey;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actor::engine::Command;
use crate::common::collections::HashMap;

const DEFAULT_CONFIG: &str = include_str!("../../xsnap.default.json");

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".xsnap.json") }

/// The four margins applied when a fractional layout is resolved to pixel
/// bounds. Window margins shrink the window and inset it from the top-left;
/// screen margins are removed from the usable display area once.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Margins {
    pub window_top: i32,
    pub window_left: i32,
    pub screen_bottom: i32,
    pub screen_right: i32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            window_top: default_margin(),
            window_left: default_margin(),
            screen_bottom: default_margin(),
            screen_right: default_margin(),
        }
    }
}

impl Margins {
    pub fn zero() -> Self {
        Self {
            window_top: 0,
            window_left: 0,
            screen_bottom: 0,
            screen_right: 0,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.window_top < 0 {
            issues.push(format!(
                "window_margin_top must be non-negative, got {}",
                self.window_top
            ));
        }
        if self.window_left < 0 {
            issues.push(format!(
                "window_margin_left must be non-negative, got {}",
                self.window_left
            ));
        }
        if self.screen_bottom < 0 {
            issues.push(format!(
                "screen_margin_bottom must be non-negative, got {}",
                self.screen_bottom
            ));
        }
        if self.screen_right < 0 {
            issues.push(format!(
                "screen_margin_right must be non-negative, got {}",
                self.screen_right
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.window_top < 0 {
            self.window_top = 0;
            fixes += 1;
        }
        if self.window_left < 0 {
            self.window_left = 0;
            fixes += 1;
        }
        if self.screen_bottom < 0 {
            self.screen_bottom = 0;
            fixes += 1;
        }
        if self.screen_right < 0 {
            self.screen_right = 0;
            fixes += 1;
        }

        fixes
    }
}

/// On-disk shape of `~/.xsnap.json`. Margin and notification fields sit at
/// the top level; unknown keys are tolerated so foreign tooling can annotate
/// the file.
#[derive(Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default = "default_margin")]
    window_margin_top: i32,
    #[serde(default = "default_margin")]
    window_margin_left: i32,
    #[serde(default = "default_margin")]
    screen_margin_bottom: i32,
    #[serde(default = "default_margin")]
    screen_margin_right: i32,
    #[serde(default)]
    notify_on_apply_layout: bool,
    #[serde(default = "yes")]
    notify_on_launch: bool,
    #[serde(default)]
    keys: HashMap<String, Command>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub margins: Margins,
    pub notify_on_apply_layout: bool,
    pub notify_on_launch: bool,
    pub keys: Vec<(Hotkey, Command)>,
}

fn default_margin() -> i32 { 30 }

fn yes() -> bool { true }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&buf)?;

        let issues = config.validate();
        if !issues.is_empty() {
            for issue in &issues {
                warn!("config: {issue}");
            }
            let fixes = config.auto_fix_values();
            debug!("auto-fixed {fixes} config value(s)");
        }

        Ok(config)
    }

    pub fn default() -> Config { Self::parse(DEFAULT_CONFIG).unwrap() }

    /// Writes the built-in default configuration to `path`, creating parent
    /// directories as needed.
    pub fn save_default(path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, DEFAULT_CONFIG.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<String> { self.margins.validate() }

    pub fn auto_fix_values(&mut self) -> usize { self.margins.auto_fix_values() }

    fn normalize_hotkey_string(key: &str) -> String {
        // Map standalone direction words to Arrow* while preserving all
        // separators/spaces.
        fn map_word(word: &str) -> &str {
            match word {
                "Up" => "ArrowUp",
                "Down" => "ArrowDown",
                "Left" => "ArrowLeft",
                "Right" => "ArrowRight",
                _ => word,
            }
        }

        let mut out = String::with_capacity(key.len());
        let mut word = String::new();

        for ch in key.chars() {
            if ch.is_alphabetic() {
                word.push(ch);
            } else {
                if !word.is_empty() {
                    out.push_str(map_word(&word));
                    word.clear();
                }
                out.push(ch);
            }
        }

        if !word.is_empty() {
            out.push_str(map_word(&word));
        }

        out
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = serde_json::from_str(buf)?;
        let mut keys = Vec::new();
        for (key, cmd) in c.keys {
            let normalized_key = Self::normalize_hotkey_string(&key);
            let Ok(hotkey) = Hotkey::from_str(&normalized_key) else {
                bail!("could not parse hotkey: {key}");
            };
            keys.push((hotkey, cmd));
        }
        Ok(Config {
            margins: Margins {
                window_top: c.window_margin_top,
                window_left: c.window_margin_left,
                screen_bottom: c.screen_margin_bottom,
                screen_right: c.screen_margin_right,
            },
            notify_on_apply_layout: c.notify_on_apply_layout,
            notify_on_launch: c.notify_on_launch,
            keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::Direction;

    #[test]
    fn test_normalize_hotkey_string() {
        assert_eq!(
            Config::normalize_hotkey_string("Meta + Alt + Down"),
            "Meta + Alt + ArrowDown"
        );
        assert_eq!(Config::normalize_hotkey_string("Ctrl + Up"), "Ctrl + ArrowUp");
        assert_eq!(
            Config::normalize_hotkey_string("Shift + Left"),
            "Shift + ArrowLeft"
        );
        assert_eq!(
            Config::normalize_hotkey_string("Meta + Right"),
            "Meta + ArrowRight"
        );

        assert_eq!(Config::normalize_hotkey_string("Alt+Down"), "Alt+ArrowDown");
        assert_eq!(Config::normalize_hotkey_string("Alt + H"), "Alt + H");
        assert_eq!(Config::normalize_hotkey_string("F1"), "F1");
    }

    #[test]
    fn default_config_parses() {
        let config = Config::default();
        assert_eq!(config.margins, Margins::default());
        assert!(!config.notify_on_apply_layout);
        assert!(config.notify_on_launch);
        assert_eq!(config.keys.len(), 4);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.margins, Margins::default());
        assert!(config.notify_on_launch);
        assert!(config.keys.is_empty());
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let config = Config::parse(r#"{"window_margin_top": 10, "comment": "hi"}"#).unwrap();
        assert_eq!(config.margins.window_top, 10);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::parse("{not json").is_err());
        assert!(Config::parse(r#"{"window_margin_top": "thirty"}"#).is_err());
    }

    #[test]
    fn unparseable_hotkey_is_an_error() {
        let err = Config::parse(r#"{"keys": {"Blorp + Q + Q": "reload_config"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn keys_parse_to_commands() {
        let config = Config::parse(
            r#"{
                "keys": {
                    "Meta + Alt + Left": { "snap": "left" },
                    "Meta + Alt + M": { "apply": "Maximized" },
                    "Meta + Alt + R": "reload_config"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.keys.len(), 3);
        assert!(
            config
                .keys
                .iter()
                .any(|(_, cmd)| *cmd == Command::Snap(Direction::Left))
        );
        assert!(
            config
                .keys
                .iter()
                .any(|(_, cmd)| *cmd == Command::Apply(crate::layout::Layout::Maximized))
        );
        assert!(config.keys.iter().any(|(_, cmd)| *cmd == Command::ReloadConfig));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        let issues = config.validate();
        assert!(issues.is_empty());

        config.margins.window_top = -5;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("window_margin_top must be non-negative"));

        let fixes = config.auto_fix_values();
        assert_eq!(fixes, 1);
        assert_eq!(config.margins.window_top, 0);
    }

    #[test]
    fn read_round_trips_saved_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xsnap.json");
        Config::save_default(&path).unwrap();
        let config = Config::read(&path).unwrap();
        assert_eq!(config.margins, Margins::default());
        assert_eq!(config.keys.len(), 4);
    }
}
