//! miditype - Use a MIDI controller as a computer keyboard
//!
//! Turns MIDI note events from a hardware controller into simulated key
//! presses, so a piano can type. Features include:
//!
//! - Note-to-key mapping configured via TOML file
//! - Key repeat while a note stays held (typematic delay and interval)
//! - Sustain pedal (CC 64) mapped to a key of its own
//! - Interactive MIDI input port selection
//! - Dry-run mode that logs key events instead of emitting them
//!
//! # Usage as a Library
//!
//! ```no_run
//! use miditype::{Config, EventTranslator, MidiEvent, NullKeyboard};
//! use std::sync::Arc;
//!
//! // Load the key map and repeat timing from the config file
//! let config = Config::load_or_default();
//! let keymap = config.keymap().unwrap();
//!
//! // Translate MIDI events into key presses (NullKeyboard only logs)
//! let mut translator =
//!     EventTranslator::new(keymap, Arc::new(NullKeyboard), config.repeat_settings());
//! translator
//!     .handle(MidiEvent::NoteOn { channel: 0, note: 60, velocity: 100 })
//!     .unwrap();
//! translator
//!     .handle(MidiEvent::NoteOff { channel: 0, note: 60 })
//!     .unwrap();
//! ```

pub mod config;
pub mod error;
pub mod keymap;
pub mod keys;
pub mod midi;
pub mod output;
pub mod repeat;
pub mod session;
pub mod translator;

// Re-export main types
pub use config::{Config, MidiSettings, RepeatConfig};
pub use error::{Error, Result};
pub use keymap::{KeyMap, Slot, SUSTAIN_TABLE_KEY};
pub use keys::{KeyId, NamedKey};
pub use midi::{note_name, MidiEvent, MidiListener, MidiPort, SUSTAIN_CONTROLLER};
pub use output::{is_available as keyboard_available, KeyboardOutput, NullKeyboard, RdevKeyboard};
pub use repeat::{RepeatSettings, RepeatTimer, DEFAULT_DELAY_MS, DEFAULT_INTERVAL_MS};
pub use session::Session;
pub use translator::{EventTranslator, SUSTAIN_THRESHOLD};
