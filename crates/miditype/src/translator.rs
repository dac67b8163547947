//! MIDI-to-keyboard translation
//!
//! [`EventTranslator`] is the state machine at the center of miditype: it
//! consumes normalized MIDI events and drives key presses, releases, and the
//! per-note repeat timers. All state lives here and is mutated only by the
//! single event-consuming path; repeat threads never touch it.

use crate::error::Result;
use crate::keymap::{KeyMap, Slot};
use crate::keys::KeyId;
use crate::midi::{MidiEvent, SUSTAIN_CONTROLLER};
use crate::output::KeyboardOutput;
use crate::repeat::{RepeatSettings, RepeatTimer};
use std::collections::HashMap;
use std::sync::Arc;

/// Pedal values at or above this count as "down"
pub const SUSTAIN_THRESHOLD: u8 = 64;

/// A currently held slot: the pressed key and its repeat timer.
///
/// The two live together so they cannot desynchronize; removing the entry is
/// the only way a timer goes away.
struct HeldKey {
    key: KeyId,
    timer: RepeatTimer,
}

/// Translates MIDI events into key press/release actions
pub struct EventTranslator {
    keymap: KeyMap,
    output: Arc<dyn KeyboardOutput>,
    settings: RepeatSettings,
    held: HashMap<Slot, HeldKey>,
    sustain_down: bool,
}

impl EventTranslator {
    pub fn new(
        keymap: KeyMap,
        output: Arc<dyn KeyboardOutput>,
        settings: RepeatSettings,
    ) -> Self {
        Self {
            keymap,
            output,
            settings,
            held: HashMap::new(),
            sustain_down: false,
        }
    }

    /// Feed one event through the state machine
    pub fn handle(&mut self, event: MidiEvent) -> Result<()> {
        match event {
            MidiEvent::NoteOn { note, velocity, .. } => self.note_on(note, velocity),
            MidiEvent::NoteOff { note, .. } => self.note_off(note),
            MidiEvent::ControlChange {
                controller: SUSTAIN_CONTROLLER,
                value,
                ..
            } => self.sustain_change(value),
            MidiEvent::ControlChange { .. } => Ok(()),
        }
    }

    /// Note-on: press the mapped key and start its repeat timer.
    ///
    /// Velocity 0 is treated as note-off (MIDI convention). A note that is
    /// already held is left alone, so duplicate note-ons cannot double-press
    /// or spawn a second timer.
    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        if velocity == 0 {
            return self.note_off(note);
        }
        self.press_slot(Slot::Note(note))
    }

    /// Note-off: stop the repeat timer, wait for it, then release the key.
    ///
    /// A note that is not held is a no-op; controllers are known to emit
    /// duplicate or out-of-order offs.
    pub fn note_off(&mut self, note: u8) -> Result<()> {
        self.release_slot(Slot::Note(note))
    }

    /// Sustain pedal movement (CC 64).
    ///
    /// Only threshold crossings act; value jitter on one side of the
    /// threshold does nothing. The pedal goes through the same held-slot
    /// machinery as a real note, repeat timer included.
    pub fn sustain_change(&mut self, value: u8) -> Result<()> {
        let down = value >= SUSTAIN_THRESHOLD;
        if down == self.sustain_down {
            return Ok(());
        }
        self.sustain_down = down;
        if down {
            self.press_slot(Slot::Sustain)
        } else {
            self.release_slot(Slot::Sustain)
        }
    }

    /// Release everything currently held, including the sustain slot.
    ///
    /// Cleanup is best-effort: a key that fails to release is logged and the
    /// others are still attempted. This must run before the process exits so
    /// no key is left down in the OS.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            log::info!("Releasing {} held key(s)", self.held.len());
            let slots: Vec<Slot> = self.held.keys().copied().collect();
            for slot in slots {
                if let Err(e) = self.release_slot(slot) {
                    log::error!("Failed to release {}: {}", slot, e);
                }
            }
        }
        self.sustain_down = false;
    }

    /// Number of currently held slots
    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Whether a slot is currently held
    pub fn is_held(&self, slot: Slot) -> bool {
        self.held.contains_key(&slot)
    }

    fn press_slot(&mut self, slot: Slot) -> Result<()> {
        let key = match self.keymap.get(slot) {
            Some(key) => key,
            None => {
                log::debug!("No key mapped for {}, ignoring", slot);
                return Ok(());
            }
        };

        if self.held.contains_key(&slot) {
            log::debug!("{} already held", slot);
            return Ok(());
        }

        self.output.press(key)?;
        log::info!("⬇️  {} -> press {}", slot, key);

        let timer = RepeatTimer::spawn(key, self.settings, Arc::clone(&self.output));
        self.held.insert(slot, HeldKey { key, timer });
        Ok(())
    }

    fn release_slot(&mut self, slot: Slot) -> Result<()> {
        let held = match self.held.remove(&slot) {
            Some(held) => held,
            None => {
                log::debug!("{} not held, ignoring", slot);
                return Ok(());
            }
        };

        // Join the repeat thread first so no press can trail the release.
        held.timer.cancel();

        self.output.release(held.key)?;
        log::info!("⬆️  {} -> release {}", slot, held.key);
        Ok(())
    }
}

impl Drop for EventTranslator {
    fn drop(&mut self) {
        self.release_all();
    }
}
