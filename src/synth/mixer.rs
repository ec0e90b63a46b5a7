//! Scheduled Mixer - the Pull Side of the Engine
//!
//! An audio callback repeatedly asks the mixer for the next block; the
//! mixer advances a global sample cursor, decides which scheduled notes
//! fall inside the block, renders each active voice into a preallocated
//! scratch buffer, and sums the results into the caller's output.
//!
//! # Threading Discipline
//!
//! All filter and voice state is touched only from the thread calling
//! `read`. Scheduling from other threads goes through a lock-free SPSC
//! ring ([`ScheduledMixer::with_queue`]) that is drained at the START of
//! each read - never mid-render - and cancellation is an atomic flag on
//! the event, polled once per tick before rendering. No locks, no
//! allocation, no I/O anywhere in the read path.
//!
//! # Sample Accuracy
//!
//! A note whose start sample lands in the middle of a block begins
//! rendering at the matching intra-block offset, not at the block
//! boundary.

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::event::ScheduledNote;
use crate::synth::NoteHandle;
use crate::MAX_BLOCK_SIZE;

pub struct ScheduledMixer {
    pending: Vec<ScheduledNote>,
    active: Vec<ScheduledNote>,
    /// Global sample clock: total frames rendered since creation.
    cursor: u64,
    scratch: Vec<f32>,
    #[cfg(feature = "rtrb")]
    incoming: Option<Consumer<ScheduledNote>>,
}

impl ScheduledMixer {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            active: Vec::new(),
            cursor: 0,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            #[cfg(feature = "rtrb")]
            incoming: None,
        }
    }

    /// Create a mixer fed by a lock-free queue, for callers that schedule
    /// from a different thread than the audio callback.
    #[cfg(feature = "rtrb")]
    pub fn with_queue(incoming: Consumer<ScheduledNote>) -> Self {
        Self {
            incoming: Some(incoming),
            ..Self::new()
        }
    }

    /// Insert a note directly (same-thread scheduling).
    ///
    /// The event is moved in, so an event instance can only ever be
    /// scheduled once. Returns the cancellation handle.
    pub fn schedule(&mut self, note: ScheduledNote) -> NoteHandle {
        let handle = note.handle();
        self.pending.push(note);
        handle
    }

    /// Total frames rendered so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn pending_notes(&self) -> usize {
        self.pending.len()
    }

    pub fn active_voices(&self) -> usize {
        self.active.len()
    }

    /// Render the next `count` frames, summed into
    /// `out[offset..offset + count]`, and advance the sample cursor.
    ///
    /// Returns the number of frames written. Zero active voices still
    /// yields silence and advances the clock, so scheduled notes stay
    /// aligned with wall-clock playback.
    pub fn read(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize {
        let offset = offset.min(out.len());
        let count = count.min(self.scratch.len()).min(out.len() - offset);
        let out = &mut out[offset..offset + count];
        out.fill(0.0);

        #[cfg(feature = "rtrb")]
        if let Some(incoming) = &mut self.incoming {
            while let Ok(note) = incoming.pop() {
                self.pending.push(note);
            }
        }

        let block_end = self.cursor + count as u64;

        // Promote pending notes whose start falls inside this block.
        // A note cancelled while pending is dropped without ever rendering.
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].is_cancelled() {
                self.pending.swap_remove(i);
            } else if self.pending[i].note().start_sample < block_end {
                let event = self.pending.swap_remove(i);
                event.activate();
                self.active.push(event);
            } else {
                i += 1;
            }
        }

        // Render active voices. The cancel check happens before the render
        // call, so a cancel observed this tick stops the voice cold.
        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].is_cancelled() {
                self.active.swap_remove(i);
                continue;
            }

            let event = &mut self.active[i];
            // First block after activation may start mid-buffer
            let begin = event.note().start_sample.saturating_sub(self.cursor) as usize;
            let frames = count - begin;

            self.scratch[..frames].fill(0.0);
            let written = event.voice_mut().render(&mut self.scratch, 0, frames);

            for (o, s) in out[begin..begin + written]
                .iter_mut()
                .zip(&self.scratch[..written])
            {
                *o += *s;
            }

            if event.voice().is_done() {
                event.finish();
                self.active.swap_remove(i);
            } else {
                i += 1;
            }
        }

        self.cursor = block_end;
        count
    }
}

impl Default for ScheduledMixer {
    fn default() -> Self {
        Self::new()
    }
}
