//! Note-to-key mapping
//!
//! Maps MIDI notes (and the sustain pedal) to keyboard keys. The map is
//! built once from the `[keymap]` config table and never changes during a
//! session; slots without an entry are simply ignored by the translator.

use crate::error::{Error, Result};
use crate::keys::KeyId;
use crate::midi::note_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Reserved `[keymap]` table key that binds the sustain pedal
pub const SUSTAIN_TABLE_KEY: &str = "sustain";

/// A pressable slot: a real MIDI note or the sustain pedal
///
/// The pedal has no MIDI note number, so it gets its own variant instead of
/// a reserved number that could collide with real notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// MIDI note number (0-127)
    Note(u8),
    /// The sustain pedal (CC 64)
    Sustain,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Note(note) => write!(f, "note {} ({})", note_name(*note), note),
            Slot::Sustain => write!(f, "sustain pedal"),
        }
    }
}

/// Static mapping from slots to keyboard keys
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    notes: HashMap<u8, KeyId>,
    sustain: Option<KeyId>,
}

impl KeyMap {
    /// Create an empty key map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a key map from the raw config table.
    ///
    /// Table keys are MIDI note numbers ("0"-"127") or the reserved word
    /// "sustain"; values are key map values as parsed by [`KeyId`].
    /// Every entry is validated here so a typo fails at startup, not
    /// mid-session.
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self> {
        let mut map = Self::new();
        for (slot, value) in table {
            let key: KeyId = value.parse()?;
            if slot == SUSTAIN_TABLE_KEY {
                map.sustain = Some(key);
            } else {
                let note: u8 = slot.parse().map_err(|_| {
                    Error::KeyMap(format!(
                        "invalid key map entry '{}' (expected a note number 0-127 or \"sustain\")",
                        slot
                    ))
                })?;
                if note > 127 {
                    return Err(Error::KeyMap(format!(
                        "note number {} out of range (0-127)",
                        note
                    )));
                }
                map.notes.insert(note, key);
            }
        }
        Ok(map)
    }

    /// Bind a slot to a key
    pub fn insert(&mut self, slot: Slot, key: KeyId) {
        match slot {
            Slot::Note(note) => {
                self.notes.insert(note, key);
            }
            Slot::Sustain => self.sustain = Some(key),
        }
    }

    /// Look up the key bound to a slot
    pub fn get(&self, slot: Slot) -> Option<KeyId> {
        match slot {
            Slot::Note(note) => self.notes.get(&note).copied(),
            Slot::Sustain => self.sustain,
        }
    }

    /// Number of bound slots, sustain included
    pub fn len(&self) -> usize {
        self.notes.len() + usize::from(self.sustain.is_some())
    }

    /// True if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.sustain.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::NamedKey;

    fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_table() {
        let map = KeyMap::from_table(&table(&[("60", "a"), ("sustain", "shift-left")])).unwrap();
        assert_eq!(map.get(Slot::Note(60)), Some(KeyId::Char('a')));
        assert_eq!(map.get(Slot::Sustain), Some(KeyId::Named(NamedKey::ShiftLeft)));
        assert_eq!(map.get(Slot::Note(61)), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_from_table_rejects_bad_note() {
        assert!(KeyMap::from_table(&table(&[("abc", "a")])).is_err());
        assert!(KeyMap::from_table(&table(&[("128", "a")])).is_err());
        assert!(KeyMap::from_table(&table(&[("-1", "a")])).is_err());
    }

    #[test]
    fn test_from_table_rejects_bad_key_value() {
        assert!(KeyMap::from_table(&table(&[("60", "bogus-key")])).is_err());
    }

    #[test]
    fn test_empty_table() {
        let map = KeyMap::from_table(&BTreeMap::new()).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.get(Slot::Sustain), None);
    }

    #[test]
    fn test_insert() {
        let mut map = KeyMap::new();
        map.insert(Slot::Note(72), KeyId::Char('k'));
        map.insert(Slot::Sustain, KeyId::Named(NamedKey::Space));
        assert_eq!(map.get(Slot::Note(72)), Some(KeyId::Char('k')));
        assert_eq!(map.get(Slot::Sustain), Some(KeyId::Named(NamedKey::Space)));
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::Note(60).to_string(), "note C4 (60)");
        assert_eq!(Slot::Sustain.to_string(), "sustain pedal");
    }
}
