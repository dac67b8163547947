//! MIDI input support
//!
//! Raw bytes from a midir input port are decoded into normalized
//! [`MidiEvent`]s and delivered over a crossbeam channel. The connection
//! handle must stay alive for as long as events are wanted.

use crate::error::{Error, Result};
use crossbeam_channel::{unbounded, Receiver};
use midir::{MidiInput, MidiInputConnection};

/// Controller number of the sustain (damper) pedal
pub const SUSTAIN_CONTROLLER: u8 = 64;

/// Normalized MIDI event
///
/// Only the message types the translator consumes; everything else is
/// dropped at decode time. A note-on with velocity 0 is delivered verbatim;
/// the translator owns the "velocity 0 means note-off" convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    /// Note on (channel 0-15, note 0-127, velocity 0-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note off (channel 0-15, note 0-127)
    NoteOff { channel: u8, note: u8 },
    /// Control change (channel, controller number, value)
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Parse raw MIDI bytes into an event
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 3 {
            return None;
        }

        let status = bytes[0];
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                note: bytes[1],
                velocity: bytes[2],
            }),
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                note: bytes[1],
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: bytes[1],
                value: bytes[2],
            }),
            _ => None,
        }
    }

    /// The MIDI channel this event arrived on
    pub fn channel(&self) -> u8 {
        match self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. } => *channel,
        }
    }
}

/// Musical name of a MIDI note number ("C4" for 60)
pub fn note_name(note: u8) -> String {
    let names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let octave = (note / 12) as i8 - 1;
    let name = names[(note % 12) as usize];
    format!("{}{}", name, octave)
}

/// An available MIDI input port
#[derive(Debug, Clone)]
pub struct MidiPort {
    /// Port index (for connecting)
    pub index: usize,
    /// Port name as reported by the system
    pub name: String,
}

/// Live MIDI input connection feeding normalized events into a channel
pub struct MidiListener {
    /// Keeps the midir connection alive
    _connection: MidiInputConnection<()>,
    events: Receiver<MidiEvent>,
    port_name: String,
}

impl MidiListener {
    /// List available MIDI input ports
    pub fn ports() -> Result<Vec<MidiPort>> {
        let midi_in = MidiInput::new("miditype-probe")
            .map_err(|e| Error::Midi(format!("failed to create MIDI input: {}", e)))?;

        let ports = midi_in.ports();
        let mut available = Vec::new();

        for (index, port) in ports.iter().enumerate() {
            let name = midi_in
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown device {}", index));
            available.push(MidiPort { index, name });
        }

        Ok(available)
    }

    /// Connect to the input port at the given index
    pub fn connect(port_index: usize) -> Result<Self> {
        let midi_in = MidiInput::new("miditype")
            .map_err(|e| Error::Midi(format!("failed to create MIDI input: {}", e)))?;

        let ports = midi_in.ports();
        let port = ports
            .get(port_index)
            .ok_or_else(|| Error::Midi(format!("invalid MIDI port index: {}", port_index)))?;

        let name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown device {}", port_index));

        let (tx, rx) = unbounded();
        let connection = midi_in
            .connect(
                port,
                "miditype-input",
                move |_timestamp, bytes, _| {
                    if let Some(event) = MidiEvent::decode(bytes) {
                        log::debug!("MIDI in: {:?}", event);
                        let _ = tx.send(event);
                    } else {
                        log::trace!("Ignoring MIDI bytes: {:?}", bytes);
                    }
                },
                (),
            )
            .map_err(|e| Error::Midi(format!("failed to connect to '{}': {}", name, e)))?;

        log::info!("Connected to MIDI input: {} (port {})", name, port_index);

        Ok(Self {
            _connection: connection,
            events: rx,
            port_name: name,
        })
    }

    /// Connect to the first port whose name contains `name` (case-insensitive)
    pub fn connect_by_name(name: &str) -> Result<Self> {
        let ports = Self::ports()?;
        let needle = name.to_lowercase();

        let port = ports
            .into_iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .ok_or_else(|| Error::Midi(format!("no MIDI input port matching '{}'", name)))?;

        Self::connect(port.index)
    }

    /// Receiver of decoded events
    pub fn events(&self) -> &Receiver<MidiEvent> {
        &self.events
    }

    /// Name of the connected port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_note_on() {
        assert_eq!(
            MidiEvent::decode(&[0x90, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::decode(&[0x95, 72, 1]),
            Some(MidiEvent::NoteOn {
                channel: 5,
                note: 72,
                velocity: 1
            })
        );
    }

    #[test]
    fn test_decode_note_on_velocity_zero_is_verbatim() {
        // The velocity-0 convention is applied by the translator, not here
        assert_eq!(
            MidiEvent::decode(&[0x90, 60, 0]),
            Some(MidiEvent::NoteOn {
                channel: 0,
                note: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn test_decode_note_off() {
        assert_eq!(
            MidiEvent::decode(&[0x82, 48, 64]),
            Some(MidiEvent::NoteOff {
                channel: 2,
                note: 48
            })
        );
    }

    #[test]
    fn test_decode_control_change() {
        assert_eq!(
            MidiEvent::decode(&[0xB0, SUSTAIN_CONTROLLER, 127]),
            Some(MidiEvent::ControlChange {
                channel: 0,
                controller: 64,
                value: 127
            })
        );
    }

    #[test]
    fn test_decode_ignores_other_messages() {
        assert_eq!(MidiEvent::decode(&[0xE0, 0, 64]), None); // pitch bend
        assert_eq!(MidiEvent::decode(&[0xC0, 5, 0]), None); // program change
        assert_eq!(MidiEvent::decode(&[0xF8]), None); // clock
        assert_eq!(MidiEvent::decode(&[0x90, 60]), None); // truncated
        assert_eq!(MidiEvent::decode(&[]), None);
    }

    #[test]
    fn test_event_channel() {
        let event = MidiEvent::ControlChange {
            channel: 9,
            controller: 64,
            value: 0,
        };
        assert_eq!(event.channel(), 9);
    }

    #[test]
    fn test_note_name() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(48), "C3");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(127), "G9");
    }
}
