//! All-Pass Filter - Diffusion without Coloration
//!
//! The standard Schroeder all-pass topology:
//!
//! ```text
//! y[n] = -g·x[n] + x[n - delay] + g·y[n - delay]
//! ```
//!
//! Implemented as: read the delayed sample, form `y = -g·x + delayed`, then
//! store `x + g·y` back into the line. The magnitude response is unity at
//! every frequency - the filter colors only the phase. Chained in series
//! after the comb bank, each stage multiplies the echo density without
//! changing the spectral envelope, which is exactly what turns discrete
//! comb echoes into a diffuse reverb tail.
//!
//! `g` is the diffusion coefficient: higher values smear the impulse
//! response into noise-like density faster.

#[derive(Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    diffusion: f32,
}

impl AllpassFilter {
    /// Create an all-pass with a fixed delay and diffusion coefficient.
    pub fn new(delay_samples: usize, diffusion: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            diffusion: diffusion.clamp(0.0, 0.9),
        }
    }

    pub fn set_diffusion(&mut self, diffusion: f32) {
        self.diffusion = diffusion.clamp(0.0, 0.9);
    }

    /// Process one sample.
    ///
    /// The buffer length equals the delay, so the slot under the write
    /// cursor holds exactly the sample from `delay` steps ago.
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];

        let output = -self.diffusion * input + delayed;
        self.buffer[self.write_pos] = input + self.diffusion * output;

        self.write_pos = (self.write_pos + 1) % self.buffer.len();

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
