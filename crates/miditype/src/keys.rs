//! Logical key identifiers
//!
//! A [`KeyId`] names a keyboard key independently of the output backend:
//! either a printable character or a named key such as "shift-left".
//! Key map values parse into this type via [`FromStr`].

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A keyboard key, as referenced by the key map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    /// A printable character key ('a', '5', '/', ...)
    Char(char),
    /// A non-character key ("enter", "shift-left", ...)
    Named(NamedKey),
}

/// Named (non-character) keyboard keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Insert,
    Escape,
    Home,
    End,
    PageUp,
    PageDown,
    CapsLock,
    ShiftLeft,
    ShiftRight,
    CtrlLeft,
    CtrlRight,
    Alt,
    AltGr,
    MetaLeft,
    MetaRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl NamedKey {
    /// Canonical config token for this key
    pub fn token(self) -> &'static str {
        match self {
            NamedKey::Space => "space",
            NamedKey::Enter => "enter",
            NamedKey::Tab => "tab",
            NamedKey::Backspace => "backspace",
            NamedKey::Delete => "delete",
            NamedKey::Insert => "insert",
            NamedKey::Escape => "escape",
            NamedKey::Home => "home",
            NamedKey::End => "end",
            NamedKey::PageUp => "page-up",
            NamedKey::PageDown => "page-down",
            NamedKey::CapsLock => "caps-lock",
            NamedKey::ShiftLeft => "shift-left",
            NamedKey::ShiftRight => "shift-right",
            NamedKey::CtrlLeft => "ctrl-left",
            NamedKey::CtrlRight => "ctrl-right",
            NamedKey::Alt => "alt",
            NamedKey::AltGr => "alt-gr",
            NamedKey::MetaLeft => "meta-left",
            NamedKey::MetaRight => "meta-right",
            NamedKey::ArrowUp => "arrow-up",
            NamedKey::ArrowDown => "arrow-down",
            NamedKey::ArrowLeft => "arrow-left",
            NamedKey::ArrowRight => "arrow-right",
            NamedKey::F1 => "f1",
            NamedKey::F2 => "f2",
            NamedKey::F3 => "f3",
            NamedKey::F4 => "f4",
            NamedKey::F5 => "f5",
            NamedKey::F6 => "f6",
            NamedKey::F7 => "f7",
            NamedKey::F8 => "f8",
            NamedKey::F9 => "f9",
            NamedKey::F10 => "f10",
            NamedKey::F11 => "f11",
            NamedKey::F12 => "f12",
        }
    }

    /// Parse a lowercase token, accepting a few common aliases
    fn parse_token(token: &str) -> Option<Self> {
        let key = match token {
            "space" => NamedKey::Space,
            "enter" | "return" => NamedKey::Enter,
            "tab" => NamedKey::Tab,
            "backspace" => NamedKey::Backspace,
            "delete" | "del" => NamedKey::Delete,
            "insert" => NamedKey::Insert,
            "escape" | "esc" => NamedKey::Escape,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "page-up" => NamedKey::PageUp,
            "page-down" => NamedKey::PageDown,
            "caps-lock" => NamedKey::CapsLock,
            "shift-left" | "shift" => NamedKey::ShiftLeft,
            "shift-right" => NamedKey::ShiftRight,
            "ctrl-left" | "ctrl" | "control-left" => NamedKey::CtrlLeft,
            "ctrl-right" | "control-right" => NamedKey::CtrlRight,
            "alt" => NamedKey::Alt,
            "alt-gr" | "altgr" => NamedKey::AltGr,
            "meta-left" | "meta" | "super" | "cmd" => NamedKey::MetaLeft,
            "meta-right" => NamedKey::MetaRight,
            "arrow-up" | "up" => NamedKey::ArrowUp,
            "arrow-down" | "down" => NamedKey::ArrowDown,
            "arrow-left" | "left" => NamedKey::ArrowLeft,
            "arrow-right" | "right" => NamedKey::ArrowRight,
            "f1" => NamedKey::F1,
            "f2" => NamedKey::F2,
            "f3" => NamedKey::F3,
            "f4" => NamedKey::F4,
            "f5" => NamedKey::F5,
            "f6" => NamedKey::F6,
            "f7" => NamedKey::F7,
            "f8" => NamedKey::F8,
            "f9" => NamedKey::F9,
            "f10" => NamedKey::F10,
            "f11" => NamedKey::F11,
            "f12" => NamedKey::F12,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for KeyId {
    type Err = Error;

    /// Parse a key map value: a single character or a named-key token.
    ///
    /// Letters are case-folded ('A' and 'a' are the same key); tokens are
    /// matched case-insensitively. Use the "space" token for the space bar.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(Error::KeyMap("empty key value".to_string())),
            (Some(c), None) => Ok(KeyId::Char(c.to_ascii_lowercase())),
            _ => {
                let token = s.to_lowercase();
                NamedKey::parse_token(&token)
                    .map(KeyId::Named)
                    .ok_or_else(|| Error::KeyMap(format!("unknown key token '{}'", s)))
            }
        }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Char(c) => write!(f, "'{}'", c),
            KeyId::Named(key) => write!(f, "{}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_char() {
        assert_eq!("a".parse::<KeyId>().unwrap(), KeyId::Char('a'));
        assert_eq!("5".parse::<KeyId>().unwrap(), KeyId::Char('5'));
        assert_eq!("/".parse::<KeyId>().unwrap(), KeyId::Char('/'));
    }

    #[test]
    fn test_parse_char_case_folds() {
        assert_eq!("A".parse::<KeyId>().unwrap(), KeyId::Char('a'));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(
            "space".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::Space)
        );
        assert_eq!(
            "shift-left".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::ShiftLeft)
        );
        assert_eq!(
            "arrow-up".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::ArrowUp)
        );
        assert_eq!("f12".parse::<KeyId>().unwrap(), KeyId::Named(NamedKey::F12));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "return".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::Enter)
        );
        assert_eq!(
            "esc".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::Escape)
        );
        assert_eq!(
            "up".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::ArrowUp)
        );
        assert_eq!(
            "shift".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::ShiftLeft)
        );
    }

    #[test]
    fn test_parse_is_case_insensitive_for_tokens() {
        assert_eq!(
            "Shift-Left".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::ShiftLeft)
        );
        assert_eq!(
            "SPACE".parse::<KeyId>().unwrap(),
            KeyId::Named(NamedKey::Space)
        );
    }

    #[test]
    fn test_parse_unknown_token_fails() {
        assert!("bogus-key".parse::<KeyId>().is_err());
        assert!("".parse::<KeyId>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyId::Char('a').to_string(), "'a'");
        assert_eq!(KeyId::Named(NamedKey::ShiftLeft).to_string(), "shift-left");
    }

    #[test]
    fn test_token_roundtrip() {
        let keys = [
            NamedKey::Space,
            NamedKey::Enter,
            NamedKey::PageDown,
            NamedKey::CtrlRight,
            NamedKey::ArrowLeft,
            NamedKey::F10,
        ];
        for key in keys {
            assert_eq!(NamedKey::parse_token(key.token()), Some(key));
        }
    }
}
