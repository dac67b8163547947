//! Configuration file support for miditype
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/miditype/config.toml`
//! - macOS: `~/Library/Application Support/miditype/config.toml`
//! - Windows: `%APPDATA%\miditype\config.toml`

use crate::error::{Error, Result};
use crate::keymap::KeyMap;
use crate::repeat::{RepeatSettings, DEFAULT_DELAY_MS, DEFAULT_INTERVAL_MS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = r#"# miditype configuration file
#
# Each entry in [keymap] binds a MIDI note number (0-127) to a keyboard
# key: a single character or a named key token such as "space", "enter",
# "backspace", "escape", "shift-left", "arrow-up" or "f5". The reserved
# entry "sustain" binds the sustain pedal (CC 64).

[midi]
# Connect to the first input port whose name contains this string.
# Leave commented out to pick a port interactively at startup.
# port = "Launchkey"

# Only react to events on this MIDI channel (0-15). Commented out = all.
# channel = 0

[repeat]
# Milliseconds a note must stay held before its key starts repeating
delay_ms = 500

# Milliseconds between repeated presses while the note stays held
interval_ms = 50

[keymap]
# C major scale from middle C, on the home row
60 = "a"
62 = "s"
64 = "d"
65 = "f"
67 = "g"
69 = "h"
71 = "j"
72 = "k"
sustain = "shift-left"
"#;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MIDI input settings
    pub midi: MidiSettings,
    /// Key repeat settings
    pub repeat: RepeatConfig,
    /// Note-to-key mapping table; keys are note numbers or "sustain"
    pub keymap: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            midi: MidiSettings::default(),
            repeat: RepeatConfig::default(),
            keymap: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Err(Error::Config(format!(
                "Config file not found at {:?}",
                path
            )))
        }
    }

    /// Load from the default location, falling back to defaults.
    ///
    /// A missing file is normal (defaults apply); a file that exists but
    /// does not load is reported and then ignored.
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => match Self::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "miditype") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            Err(Error::Config(
                "Could not determine config directory".to_string(),
            ))
        }
    }

    /// Create a default config file with comments at the default location
    pub fn create_default_config_file() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, DEFAULT_CONFIG)?;
        Ok(path)
    }

    /// Build the runtime key map from the `[keymap]` table
    pub fn keymap(&self) -> Result<KeyMap> {
        KeyMap::from_table(&self.keymap)
    }

    /// Repeat timing as durations
    pub fn repeat_settings(&self) -> RepeatSettings {
        RepeatSettings {
            delay: Duration::from_millis(self.repeat.delay_ms),
            // interval 0 would busy-loop the repeat thread
            interval: Duration::from_millis(self.repeat.interval_ms.max(1)),
        }
    }
}

/// MIDI input settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MidiSettings {
    /// Input port name substring to connect to (prompted for if unset)
    pub port: Option<String>,
    /// Only react to this MIDI channel, 0-15 (all channels if unset)
    pub channel: Option<u8>,
}

/// Key repeat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    /// Milliseconds a note must stay held before its key starts repeating
    pub delay_ms: u64,
    /// Milliseconds between repeated presses
    pub interval_ms: u64,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Slot;
    use crate::keys::KeyId;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.repeat.delay_ms, 500);
        assert_eq!(config.repeat.interval_ms, 50);
        assert!(config.midi.port.is_none());
        assert!(config.midi.channel.is_none());
        assert!(config.keymap.is_empty());
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.midi.port = Some("Launchkey".to_string());
        config.repeat.delay_ms = 250;
        config
            .keymap
            .insert("60".to_string(), "a".to_string());

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.midi.port.as_deref(), Some("Launchkey"));
        assert_eq!(loaded.repeat.delay_ms, 250);
        assert_eq!(loaded.keymap.get("60").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_default_config_file_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.repeat.delay_ms, 500);
        assert_eq!(config.repeat.interval_ms, 50);

        let keymap = config.keymap().unwrap();
        assert_eq!(keymap.get(Slot::Note(60)), Some(KeyId::Char('a')));
        assert!(keymap.get(Slot::Sustain).is_some());
        assert_eq!(keymap.len(), 9);
    }

    #[test]
    fn test_bad_keymap_entry_fails_conversion() {
        let mut config = Config::default();
        config
            .keymap
            .insert("60".to_string(), "bogus-key".to_string());
        assert!(config.keymap().is_err());
    }

    #[test]
    fn test_repeat_settings_conversion() {
        let mut config = Config::default();
        config.repeat.delay_ms = 200;
        config.repeat.interval_ms = 0;

        let settings = config.repeat_settings();
        assert_eq!(settings.delay, Duration::from_millis(200));
        assert_eq!(settings.interval, Duration::from_millis(1));
    }
}
