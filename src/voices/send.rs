use crate::dsp::{ReverbEffect, ReverbSettings};
use crate::synth::source::SignalSource;

/// A source whose output runs through its own [`ReverbEffect`].
///
/// The send owns the reverb exclusively, so no locking is needed in the
/// render path. After the inner source finishes, the send keeps rendering
/// silence through the effect until the tail has decayed, then reports
/// done - retiring at the instant the dry signal ends would cut the
/// reverb off with an audible click.
pub struct ReverbSend {
    inner: Box<dyn SignalSource>,
    reverb: ReverbEffect,
    velocity_norm: f32,
    tail_remaining: u64,
    done: bool,
}

impl ReverbSend {
    pub fn new(
        inner: impl SignalSource + 'static,
        settings: ReverbSettings,
        sample_rate: f32,
        velocity_norm: f32,
    ) -> Self {
        let reverb = ReverbEffect::new(settings, sample_rate);
        Self {
            tail_remaining: reverb.tail_samples(),
            inner: Box::new(inner),
            reverb,
            velocity_norm: velocity_norm.clamp(0.0, 1.0),
            done: false,
        }
    }

    /// Reuse this send for a new note: swap the dry source, reset the
    /// reverb state, rearm the tail counter. Keeps the filter buffers
    /// allocated, so recycling a voice costs no heap work.
    pub fn rearm(&mut self, inner: impl SignalSource + 'static, velocity_norm: f32) {
        self.inner = Box::new(inner);
        self.reverb.reset();
        self.velocity_norm = velocity_norm.clamp(0.0, 1.0);
        self.tail_remaining = self.reverb.tail_samples();
        self.done = false;
    }
}

impl SignalSource for ReverbSend {
    fn render(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize {
        if self.done {
            return 0;
        }

        // Dry pass first; frames past the inner source's end are silence
        // that still has to flow through the reverb to flush the tail
        let written = self.inner.render(out, offset, count);
        out[offset + written..offset + count].fill(0.0);
        self.reverb
            .render(&mut out[offset..offset + count], self.velocity_norm);

        if self.inner.is_done() {
            self.tail_remaining = self.tail_remaining.saturating_sub((count - written) as u64);
            if self.tail_remaining == 0 {
                self.done = true;
            }
        }
        count
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
