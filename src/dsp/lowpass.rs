use std::f32::consts::TAU;

use crate::DEFAULT_SAMPLE_RATE;

/// Fallback cutoff used when the caller passes a degenerate value.
pub const DEFAULT_CUTOFF_HZ: f32 = 12_000.0;

/// A single-pole IIR lowpass filter.
///
/// Used for pre-reverb tone shaping and as the damping element inside
/// feedback loops. The coefficient is `a = exp(-2π·cutoff/sample_rate)`,
/// giving `y[n] = (1-a)·x[n] + a·y[n-1]`.
#[derive(Clone)]
pub struct OnePoleLowpass {
    a: f32,
    y_prev: f32,
}

impl OnePoleLowpass {
    /// Create a lowpass at the given cutoff.
    ///
    /// A non-positive cutoff or sample rate falls back to safe defaults
    /// rather than producing a silent or unstable filter.
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let cutoff = if cutoff_hz > 0.0 {
            cutoff_hz
        } else {
            DEFAULT_CUTOFF_HZ
        };
        let sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };

        Self {
            a: (-TAU * cutoff / sample_rate).exp(),
            y_prev: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = (1.0 - self.a) * input + self.a * self.y_prev;
        self.y_prev = output;
        output
    }

    pub fn reset(&mut self) {
        self.y_prev = 0.0;
    }
}
