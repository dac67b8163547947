//! Per-note key repeat
//!
//! While a note stays held its key auto-repeats like on a physical keyboard:
//! nothing for `delay`, then one press every `interval` until cancelled.
//! Each held slot owns one [`RepeatTimer`]; cancellation joins the thread,
//! so once `cancel` returns no further press can come from it.

use crate::keys::KeyId;
use crate::output::KeyboardOutput;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default time a note must stay held before its key starts repeating
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Default time between repeated presses
pub const DEFAULT_INTERVAL_MS: u64 = 50;

/// Repeat timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatSettings {
    /// Time before the first repeat press
    pub delay: Duration,
    /// Time between repeat presses
    pub interval: Duration,
}

impl Default for RepeatSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

/// Cancellable background task pressing one key at a fixed rate
///
/// The initial press on note-on is the translator's; this thread adds the
/// repeats, so the first one fires `delay + interval` after spawn. It never
/// emits a release.
pub struct RepeatTimer {
    cancel_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl RepeatTimer {
    /// Spawn the repeat thread for `key`
    pub fn spawn(key: KeyId, settings: RepeatSettings, output: Arc<dyn KeyboardOutput>) -> Self {
        let (cancel_tx, cancel_rx) = bounded(1);
        let thread = thread::spawn(move || run(key, settings, output, cancel_rx));
        Self {
            cancel_tx,
            thread: Some(thread),
        }
    }

    /// Stop the thread and wait for it to finish.
    ///
    /// When this returns, the timer has issued its last press, so a release
    /// emitted afterwards cannot be overtaken by a repeat.
    pub fn cancel(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.cancel_tx.try_send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for RepeatTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

// Waiting on the cancel channel doubles as the sleep, so a cancel wakes the
// thread immediately instead of waiting out the current tick.
fn run(
    key: KeyId,
    settings: RepeatSettings,
    output: Arc<dyn KeyboardOutput>,
    cancel_rx: Receiver<()>,
) {
    match cancel_rx.recv_timeout(settings.delay) {
        Err(RecvTimeoutError::Timeout) => {}
        _ => return, // cancelled before the first repeat
    }

    loop {
        match cancel_rx.recv_timeout(settings.interval) {
            Err(RecvTimeoutError::Timeout) => {
                if let Err(e) = output.press(key) {
                    log::warn!("Repeat press of {} failed: {}", key, e);
                }
            }
            _ => return,
        }
    }
}
