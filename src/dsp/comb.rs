//! Comb Filter - a Delay Line with Feedback
//!
//! Feeding a signal back into itself at a fixed delay produces a series of
//! decaying echoes, which in the frequency domain looks like a comb:
//! resonant peaks at every multiple of `sample_rate / delay_length`. One
//! comb models a single reflective path in a room; several combs at
//! mutually-prime delay lengths model many.
//!
//! The feedback tap runs through a one-pole lowpass before re-entering the
//! delay line. This is the "damping" control: each trip around the loop
//! loses a little high-frequency energy, the way real walls absorb treble
//! faster than bass.
//!
//! # Modulation
//!
//! A static comb rings at exactly its resonant frequencies, which can sound
//! metallic. Enabling modulation adds an LFO that sinusoidally perturbs the
//! effective delay length by up to `lfo_depth` samples, smearing the
//! resonant peaks the way air currents and moving bodies vary path lengths
//! in a real room. Modulated reads land between integer sample positions,
//! so the read uses linear interpolation between the two nearest samples.
//! This costs a sin() and a lerp per sample - modulation is a quality/CPU
//! trade.
//!
//! The filter's wet output is the raw delayed sample, before the feedback
//! mix.

use std::f32::consts::TAU;

#[derive(Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    delay_samples: usize,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,

    // LFO state (inert unless `modulated`)
    modulated: bool,
    lfo_phase: f32,
    lfo_increment: f32,
    lfo_depth: f32,
}

impl CombFilter {
    /// Create an unmodulated comb at a fixed integer delay.
    pub fn new(delay_samples: usize, feedback: f32, damp: f32) -> Self {
        let delay_samples = delay_samples.max(1);
        Self {
            // One slot of slack so read and write cursors never collide
            buffer: vec![0.0; delay_samples + 1],
            delay_samples,
            write_pos: 0,
            feedback: feedback.clamp(0.0, 0.99),
            damp: damp.clamp(0.0, 1.0),
            filter_state: 0.0,
            modulated: false,
            lfo_phase: 0.0,
            lfo_increment: 0.0,
            lfo_depth: 0.0,
        }
    }

    /// Create a comb whose delay length is modulated by a sine LFO.
    ///
    /// The effective delay wanders within `delay_samples ± lfo_depth`, so the
    /// buffer carries headroom for the full excursion plus interpolation.
    pub fn modulated(
        delay_samples: usize,
        feedback: f32,
        damp: f32,
        lfo_freq_hz: f32,
        lfo_depth: f32,
        sample_rate: f32,
    ) -> Self {
        let delay_samples = delay_samples.max(2);
        let lfo_depth = lfo_depth.max(0.0);
        let headroom = lfo_depth.ceil() as usize + 2;

        Self {
            buffer: vec![0.0; delay_samples + headroom],
            delay_samples,
            write_pos: 0,
            feedback: feedback.clamp(0.0, 0.99),
            damp: damp.clamp(0.0, 1.0),
            filter_state: 0.0,
            modulated: true,
            lfo_phase: 0.0,
            lfo_increment: TAU * lfo_freq_hz.max(0.0) / sample_rate.max(1.0),
            lfo_depth,
        }
    }

    pub(crate) fn delay(&self) -> usize {
        self.delay_samples
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Read the delay line at a fractional offset behind the write cursor.
    #[inline]
    fn read_fractional(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        // Keep the read inside the buffer and clear of the write cursor
        let delay = delay.clamp(1.0, (len - 2) as f32);

        let mut pos = self.write_pos as f32 - delay;
        if pos < 0.0 {
            pos += len as f32;
        }
        let index = pos as usize;
        let frac = pos - index as f32;
        let a = self.buffer[index % len];
        let b = self.buffer[(index + 1) % len];
        a + (b - a) * frac
    }

    /// Process one sample. Returns the raw delayed sample (the comb's wet
    /// output); the damped, feedback-scaled copy re-enters the delay line.
    pub fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();

        let delayed = if self.modulated {
            let offset = self.lfo_phase.sin() * self.lfo_depth;
            self.lfo_phase += self.lfo_increment;
            if self.lfo_phase >= TAU {
                self.lfo_phase -= TAU;
            }
            self.read_fractional(self.delay_samples as f32 + offset)
        } else {
            let read_pos = (self.write_pos + len - self.delay_samples) % len;
            self.buffer[read_pos]
        };

        // One-pole lowpass on the feedback tap (absorbs high frequencies)
        self.filter_state = delayed * (1.0 - self.damp) + self.filter_state * self.damp;

        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;
        self.write_pos = (self.write_pos + 1) % len;

        delayed
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
        self.lfo_phase = 0.0;
    }
}
