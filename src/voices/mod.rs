//! Concrete signal sources.
//!
//! Each voice implements [`crate::synth::SignalSource`] and plays exactly
//! one scheduled note: it renders for the note's duration, ramps in and
//! out to avoid clicks, then reports done so the mixer can retire it.
//!
//! # Example
//!
//! ```ignore
//! use tailverb::synth::{NoteExpression, ScheduledNote, ScheduledMixer};
//! use tailverb::voices::ToneVoice;
//!
//! let note = NoteExpression::new(60, 0, 22_050, 100);
//! let voice = ToneVoice::new(&note, 44_100.0);
//!
//! let mut mixer = ScheduledMixer::new();
//! let handle = mixer.schedule(ScheduledNote::new(note, voice));
//! ```

mod noise;
mod send;
mod tone;

pub use noise::NoiseVoice;
pub use send::ReverbSend;
pub use tone::ToneVoice;

/// Linear fade-in/fade-out gate over a fixed number of samples.
///
/// Shared by the simple voices: a few milliseconds of ramp at each end of
/// the note prevents clicks at note boundaries without a full ADSR.
#[derive(Clone, Copy)]
pub(crate) struct NoteGate {
    total: u64,
    position: u64,
    attack: u64,
    release: u64,
}

impl NoteGate {
    pub(crate) fn new(total_samples: u64, sample_rate: f32) -> Self {
        let attack = (0.005 * sample_rate) as u64; // 5ms in
        let release = (0.010 * sample_rate) as u64; // 10ms out
        // Degenerate short notes split between ramps
        let attack = attack.min(total_samples / 2);
        let release = release.min(total_samples / 2);
        Self {
            total: total_samples,
            position: 0,
            attack,
            release,
        }
    }

    /// Gain for the current sample, then advance.
    #[inline]
    pub(crate) fn next_gain(&mut self) -> f32 {
        let gain = if self.position < self.attack {
            self.position as f32 / self.attack.max(1) as f32
        } else if self.position + self.release >= self.total {
            (self.total - self.position) as f32 / self.release.max(1) as f32
        } else {
            1.0
        };
        self.position += 1;
        gain
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.position)
    }

    pub(crate) fn finished(&self) -> bool {
        self.position >= self.total
    }
}
