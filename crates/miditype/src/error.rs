//! Error types for miditype

use thiserror::Error;

/// Result type alias for miditype operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in miditype
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key map entry error (bad note number or key token)
    #[error("Key map error: {0}")]
    KeyMap(String),

    /// MIDI backend error
    #[error("MIDI error: {0}")]
    Midi(String),

    /// The MIDI input went away mid-session
    #[error("MIDI input disconnected")]
    InputDisconnected,

    /// Key that the output backend cannot produce
    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    /// Synthetic key event could not be delivered
    #[error("Key simulation error: {0}")]
    Simulate(#[from] rdev::SimulateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
