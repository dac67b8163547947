//! Session run loop
//!
//! Owns the translator for the lifetime of a session: consumes MIDI events
//! until shut down or the input disappears, and releases everything before
//! returning on every exit path.

use crate::error::{Error, Result};
use crate::midi::MidiEvent;
use crate::translator::EventTranslator;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the loop wakes to check the shutdown flag
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// A running translation session
pub struct Session {
    translator: EventTranslator,
    shutdown: Arc<AtomicBool>,
    channel: Option<u8>,
}

impl Session {
    pub fn new(translator: EventTranslator, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            translator,
            shutdown,
            channel: None,
        }
    }

    /// Only react to events on this MIDI channel (0-15); None means all
    pub fn with_channel(mut self, channel: Option<u8>) -> Self {
        self.channel = channel;
        self
    }

    /// Consume events until the shutdown flag is set or the input goes away.
    ///
    /// All held keys are released before this returns, on both exit paths.
    /// Losing the input is the only fatal condition; per-event errors are
    /// logged and the session keeps running.
    pub fn run(mut self, events: &Receiver<MidiEvent>) -> Result<()> {
        let result = self.event_loop(events);
        self.translator.release_all();
        match &result {
            Ok(()) => log::info!("Session ended, all keys released"),
            Err(e) => log::error!("Session ended: {}", e),
        }
        result
    }

    fn event_loop(&mut self, events: &Receiver<MidiEvent>) -> Result<()> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(());
            }

            match events.recv_timeout(SHUTDOWN_POLL) {
                Ok(event) => {
                    if let Some(channel) = self.channel {
                        if event.channel() != channel {
                            log::debug!("Ignoring event on channel {}", event.channel());
                            continue;
                        }
                    }
                    if let Err(e) = self.translator.handle(event) {
                        log::error!("Failed to handle {:?}: {}", event, e);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(Error::InputDisconnected),
            }
        }
    }
}
