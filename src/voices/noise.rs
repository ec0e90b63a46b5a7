use crate::synth::note::NoteExpression;
use crate::synth::source::SignalSource;
use crate::voices::NoteGate;

/// White-noise voice gated over the note's duration.
///
/// Pitch is ignored (noise has none) but seeds the generator, so two
/// noise notes with different pitches decorrelate. Uses an xorshift32
/// generator: no external RNG state, one xor-shift triple per sample.
pub struct NoiseVoice {
    rng_state: u32,
    amplitude: f32,
    gate: NoteGate,
    done: bool,
}

impl NoiseVoice {
    pub fn new(note: &NoteExpression, sample_rate: f32) -> Self {
        Self {
            // Never zero: xorshift fixes on zero state
            rng_state: 0x9E37_79B9 ^ ((note.pitch as u32) << 8 | note.velocity as u32),
            amplitude: note.velocity_norm(),
            gate: NoteGate::new(note.duration_samples, sample_rate),
            done: note.duration_samples == 0,
        }
    }

    #[inline]
    fn next_noise(&mut self) -> f32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        // Map to [-1, 1)
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

impl SignalSource for NoiseVoice {
    fn render(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize {
        if self.done {
            return 0;
        }

        let frames = count.min(self.gate.remaining() as usize);
        for sample in &mut out[offset..offset + frames] {
            *sample = self.next_noise() * self.amplitude * self.gate.next_gain();
        }

        if self.gate.finished() {
            self.done = true;
        }
        frames
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
