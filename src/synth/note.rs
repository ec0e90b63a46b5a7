#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// An immutable description of one note: what pitch, when, for how long,
/// how hard. Created by a sequencer ahead of playback time and read-only
/// once scheduled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteExpression {
    /// MIDI note number (0-127).
    pub pitch: u8,
    /// Absolute start time in samples on the mixer's clock.
    pub start_sample: u64,
    /// Length of the note in samples.
    pub duration_samples: u64,
    /// MIDI velocity (0-127).
    pub velocity: u8,
}

impl NoteExpression {
    pub fn new(pitch: u8, start_sample: u64, duration_samples: u64, velocity: u8) -> Self {
        Self {
            pitch: pitch.min(127),
            start_sample,
            duration_samples,
            velocity: velocity.min(127),
        }
    }

    /// Construct from musical time at a given tempo.
    pub fn from_beats(
        pitch: u8,
        start_beat: f64,
        duration_beats: f64,
        velocity: u8,
        bpm: f64,
        sample_rate: f32,
    ) -> Self {
        let samples_per_beat = 60.0 / bpm.max(1.0) * sample_rate as f64;
        Self::new(
            pitch,
            (start_beat.max(0.0) * samples_per_beat) as u64,
            (duration_beats.max(0.0) * samples_per_beat) as u64,
            velocity,
        )
    }

    pub fn frequency(&self) -> f32 {
        midi_note_to_freq(self.pitch)
    }

    /// Velocity normalized to [0, 1].
    pub fn velocity_norm(&self) -> f32 {
        self.velocity as f32 / 127.0
    }

    pub fn end_sample(&self) -> u64 {
        self.start_sample.saturating_add(self.duration_samples)
    }
}
