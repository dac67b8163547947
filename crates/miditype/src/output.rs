//! Keyboard output backends
//!
//! The translator talks to a [`KeyboardOutput`]. The real backend injects
//! synthetic key events via rdev; the null backend only logs and is used for
//! dry runs and as a fallback on headless systems.

use crate::error::{Error, Result};
use crate::keys::{KeyId, NamedKey};
use rdev::{simulate, EventType, Key};
use std::sync::Mutex;

/// Synthetic keyboard sink
///
/// Implementations must tolerate interleaved calls from the event path and
/// the repeat threads.
pub trait KeyboardOutput: Send + Sync {
    /// Press a key
    fn press(&self, key: KeyId) -> Result<()>;

    /// Release a key
    fn release(&self, key: KeyId) -> Result<()>;
}

/// Check if synthetic key events are likely to work on this system
pub fn is_available() -> bool {
    // On Linux, rdev requires X11 or Wayland
    #[cfg(target_os = "linux")]
    {
        std::env::var("DISPLAY").is_ok() || std::env::var("WAYLAND_DISPLAY").is_ok()
    }

    #[cfg(not(target_os = "linux"))]
    {
        true
    }
}

/// Keyboard output that injects OS-level key events via rdev
pub struct RdevKeyboard {
    // rdev::simulate is not documented thread-safe; one call at a time.
    lock: Mutex<()>,
}

impl RdevKeyboard {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }

    fn simulate(&self, event_type: EventType) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        simulate(&event_type)?;
        Ok(())
    }
}

impl Default for RdevKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardOutput for RdevKeyboard {
    fn press(&self, key: KeyId) -> Result<()> {
        self.simulate(EventType::KeyPress(to_rdev_key(key)?))
    }

    fn release(&self, key: KeyId) -> Result<()> {
        self.simulate(EventType::KeyRelease(to_rdev_key(key)?))
    }
}

/// Keyboard output that only logs (dry runs, headless fallback)
pub struct NullKeyboard;

impl KeyboardOutput for NullKeyboard {
    fn press(&self, key: KeyId) -> Result<()> {
        log::debug!("Keyboard (noop): press {}", key);
        Ok(())
    }

    fn release(&self, key: KeyId) -> Result<()> {
        log::debug!("Keyboard (noop): release {}", key);
        Ok(())
    }
}

/// Map a logical key to the rdev key that produces it
fn to_rdev_key(key: KeyId) -> Result<Key> {
    match key {
        KeyId::Char(c) => {
            char_to_rdev(c).ok_or_else(|| Error::UnsupportedKey(key.to_string()))
        }
        KeyId::Named(named) => Ok(named_to_rdev(named)),
    }
}

/// Character keys rdev can address directly (US layout positions)
fn char_to_rdev(c: char) -> Option<Key> {
    let key = match c {
        'a' => Key::KeyA,
        'b' => Key::KeyB,
        'c' => Key::KeyC,
        'd' => Key::KeyD,
        'e' => Key::KeyE,
        'f' => Key::KeyF,
        'g' => Key::KeyG,
        'h' => Key::KeyH,
        'i' => Key::KeyI,
        'j' => Key::KeyJ,
        'k' => Key::KeyK,
        'l' => Key::KeyL,
        'm' => Key::KeyM,
        'n' => Key::KeyN,
        'o' => Key::KeyO,
        'p' => Key::KeyP,
        'q' => Key::KeyQ,
        'r' => Key::KeyR,
        's' => Key::KeyS,
        't' => Key::KeyT,
        'u' => Key::KeyU,
        'v' => Key::KeyV,
        'w' => Key::KeyW,
        'x' => Key::KeyX,
        'y' => Key::KeyY,
        'z' => Key::KeyZ,
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        ' ' => Key::Space,
        '-' => Key::Minus,
        '=' => Key::Equal,
        '[' => Key::LeftBracket,
        ']' => Key::RightBracket,
        ';' => Key::SemiColon,
        '\'' => Key::Quote,
        '\\' => Key::BackSlash,
        ',' => Key::Comma,
        '.' => Key::Dot,
        '/' => Key::Slash,
        '`' => Key::BackQuote,
        _ => return None,
    };
    Some(key)
}

fn named_to_rdev(key: NamedKey) -> Key {
    match key {
        NamedKey::Space => Key::Space,
        NamedKey::Enter => Key::Return,
        NamedKey::Tab => Key::Tab,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Insert => Key::Insert,
        NamedKey::Escape => Key::Escape,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::CapsLock => Key::CapsLock,
        NamedKey::ShiftLeft => Key::ShiftLeft,
        NamedKey::ShiftRight => Key::ShiftRight,
        NamedKey::CtrlLeft => Key::ControlLeft,
        NamedKey::CtrlRight => Key::ControlRight,
        NamedKey::Alt => Key::Alt,
        NamedKey::AltGr => Key::AltGr,
        NamedKey::MetaLeft => Key::MetaLeft,
        NamedKey::MetaRight => Key::MetaRight,
        NamedKey::ArrowUp => Key::UpArrow,
        NamedKey::ArrowDown => Key::DownArrow,
        NamedKey::ArrowLeft => Key::LeftArrow,
        NamedKey::ArrowRight => Key::RightArrow,
        NamedKey::F1 => Key::F1,
        NamedKey::F2 => Key::F2,
        NamedKey::F3 => Key::F3,
        NamedKey::F4 => Key::F4,
        NamedKey::F5 => Key::F5,
        NamedKey::F6 => Key::F6,
        NamedKey::F7 => Key::F7,
        NamedKey::F8 => Key::F8,
        NamedKey::F9 => Key::F9,
        NamedKey::F10 => Key::F10,
        NamedKey::F11 => Key::F11,
        NamedKey::F12 => Key::F12,
    }
}

/// One observed output action (test support)
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(KeyId),
    Release(KeyId),
}

/// Keyboard output that records actions in call order (test support)
///
/// Clones share the same recording, so a clone can be handed to the code
/// under test while the original is used for assertions.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingKeyboard {
    actions: std::sync::Arc<Mutex<Vec<KeyAction>>>,
}

#[cfg(test)]
impl RecordingKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions in the order the backend saw them
    pub fn actions(&self) -> Vec<KeyAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn press_count(&self, key: KeyId) -> usize {
        self.actions()
            .iter()
            .filter(|a| **a == KeyAction::Press(key))
            .count()
    }

    pub fn release_count(&self, key: KeyId) -> usize {
        self.actions()
            .iter()
            .filter(|a| **a == KeyAction::Release(key))
            .count()
    }
}

#[cfg(test)]
impl KeyboardOutput for RecordingKeyboard {
    fn press(&self, key: KeyId) -> Result<()> {
        self.actions.lock().unwrap().push(KeyAction::Press(key));
        Ok(())
    }

    fn release(&self, key: KeyId) -> Result<()> {
        self.actions.lock().unwrap().push(KeyAction::Release(key));
        Ok(())
    }
}
