use std::f32::consts::TAU;

use crate::synth::note::NoteExpression;
use crate::synth::source::SignalSource;
use crate::voices::NoteGate;

/// A sine voice at the note's pitch, scaled by velocity, gated over the
/// note's duration.
///
/// The pure tone makes it the reference voice for the scheduling tests and
/// a clean carrier for effect sends.
pub struct ToneVoice {
    phase: f32,
    phase_increment: f32,
    amplitude: f32,
    gate: NoteGate,
    done: bool,
}

impl ToneVoice {
    pub fn new(note: &NoteExpression, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_increment: TAU * note.frequency() / sample_rate.max(1.0),
            amplitude: note.velocity_norm(),
            gate: NoteGate::new(note.duration_samples, sample_rate),
            done: note.duration_samples == 0,
        }
    }
}

impl SignalSource for ToneVoice {
    fn render(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize {
        if self.done {
            return 0;
        }

        let frames = count.min(self.gate.remaining() as usize);
        for sample in &mut out[offset..offset + frames] {
            *sample = self.phase.sin() * self.amplitude * self.gate.next_gain();
            self.phase += self.phase_increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn renders_the_note_frequency() {
        // A4: one full cycle every sample_rate / 440 samples
        let note = NoteExpression::new(69, 0, 48_000, 127);
        let mut voice = ToneVoice::new(&note, SAMPLE_RATE);

        let mut buffer = vec![0.0; 4_096];
        voice.render(&mut buffer, 0, 4_096);

        // Count zero crossings after the attack ramp; 440 Hz gives one
        // crossing every ~54.5 samples
        let crossings = buffer[512..]
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        let expected = (2.0 * 440.0 * (4_096.0 - 512.0) / SAMPLE_RATE) as usize;
        assert!(
            crossings.abs_diff(expected) <= 2,
            "expected ~{} crossings, got {}",
            expected,
            crossings
        );
    }

    #[test]
    fn velocity_scales_amplitude() {
        let loud = NoteExpression::new(60, 0, 48_000, 127);
        let soft = NoteExpression::new(60, 0, 48_000, 64);
        let mut loud_voice = ToneVoice::new(&loud, SAMPLE_RATE);
        let mut soft_voice = ToneVoice::new(&soft, SAMPLE_RATE);

        let mut a = vec![0.0; 2_048];
        let mut b = vec![0.0; 2_048];
        loud_voice.render(&mut a, 0, 2_048);
        soft_voice.render(&mut b, 0, 2_048);

        let peak = |buf: &[f32]| buf.iter().fold(0.0f32, |m, &x| m.max(x.abs()));
        let ratio = peak(&b) / peak(&a);
        assert!(
            (ratio - 64.0 / 127.0).abs() < 0.02,
            "expected amplitude ratio ~0.5, got {}",
            ratio
        );
    }

    #[test]
    fn finishes_after_its_duration() {
        let note = NoteExpression::new(60, 0, 100, 100);
        let mut voice = ToneVoice::new(&note, SAMPLE_RATE);
        let mut buffer = vec![0.0; 256];

        let written = voice.render(&mut buffer, 0, 256);
        assert_eq!(written, 100);
        assert!(voice.is_done());

        // Safe to call after done: writes nothing, returns 0
        buffer.fill(7.0);
        assert_eq!(voice.render(&mut buffer, 0, 256), 0);
        assert!(buffer.iter().all(|&s| s == 7.0));
    }

    #[test]
    fn respects_the_offset_window() {
        let note = NoteExpression::new(60, 0, 1_000, 100);
        let mut voice = ToneVoice::new(&note, SAMPLE_RATE);

        let mut buffer = vec![9.0; 96];
        voice.render(&mut buffer, 32, 32);

        assert!(buffer[..32].iter().all(|&s| s == 9.0));
        assert!(buffer[64..].iter().all(|&s| s == 9.0));
    }
}
