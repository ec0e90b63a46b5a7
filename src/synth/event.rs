//! Scheduled Note Lifecycle
//!
//! ```text
//! Pending ──(cursor reaches start)──→ Active ──(voice done)──→ Done
//!    │                                  │
//!    └──────────(cancel)──→ Cancelled ←─┘
//! ```
//!
//! # Cancellation
//!
//! Cancellation is cooperative polling, not preemption. The flag lives in
//! an atomic shared between a `NoteHandle` (any thread) and the mixer
//! (audio thread). The mixer checks it once per tick BEFORE rendering, so a
//! cancel observed before that tick's render guarantees the voice
//! contributes no further samples - a cancel racing with activation always
//! wins if it lands first. Cancelling twice, or after the note finished, is
//! a no-op.
//!
//! Writers use release ordering, the audio thread reads with acquire.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::synth::note::NoteExpression;
use crate::synth::source::SignalSource;

const PENDING: u8 = 0;
const ACTIVE: u8 = 1;
const CANCELLED: u8 = 2;
const DONE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Pending,
    Active,
    Cancelled,
    Done,
}

fn decode(raw: u8) -> NoteState {
    match raw {
        PENDING => NoteState::Pending,
        ACTIVE => NoteState::Active,
        CANCELLED => NoteState::Cancelled,
        _ => NoteState::Done,
    }
}

/// Cancellation handle for a scheduled note. Cheap to clone, safe to use
/// from any thread while the mixer renders.
#[derive(Debug, Clone)]
pub struct NoteHandle {
    state: Arc<AtomicU8>,
}

impl NoteHandle {
    /// Request cancellation. Idempotent; a note that already finished
    /// stays `Done`.
    pub fn cancel(&self) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| match raw {
                PENDING | ACTIVE => Some(CANCELLED),
                _ => None,
            });
    }

    pub fn state(&self) -> NoteState {
        decode(self.state.load(Ordering::Acquire))
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == NoteState::Cancelled
    }

    pub fn is_done(&self) -> bool {
        self.state() == NoteState::Done
    }
}

/// A note bound to the voice that will play it.
///
/// The voice is exclusively owned by the event until the mixer retires it;
/// scheduling moves the event into the mixer, so the same event cannot be
/// inserted twice.
pub struct ScheduledNote {
    note: NoteExpression,
    voice: Box<dyn SignalSource>,
    state: Arc<AtomicU8>,
}

impl ScheduledNote {
    pub fn new(note: NoteExpression, voice: impl SignalSource + 'static) -> Self {
        Self::from_boxed(note, Box::new(voice))
    }

    pub fn from_boxed(note: NoteExpression, voice: Box<dyn SignalSource>) -> Self {
        Self {
            note,
            voice,
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    pub fn note(&self) -> &NoteExpression {
        &self.note
    }

    /// Get a cancellation handle. Call before handing the event to the
    /// mixer (scheduling consumes the event).
    pub fn handle(&self) -> NoteHandle {
        NoteHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn state(&self) -> NoteState {
        decode(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.state() == NoteState::Cancelled
    }

    /// Pending → Active. Loses quietly to a concurrent cancel.
    pub(crate) fn activate(&self) {
        let _ = self.state.compare_exchange(
            PENDING,
            ACTIVE,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Active → Done, once the voice reports exhaustion.
    pub(crate) fn finish(&self) {
        let _ = self.state.compare_exchange(
            ACTIVE,
            DONE,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub(crate) fn voice_mut(&mut self) -> &mut dyn SignalSource {
        &mut *self.voice
    }

    pub(crate) fn voice(&self) -> &dyn SignalSource {
        &*self.voice
    }
}
