/// Render contract for anything that produces audio: note voices, noise
/// generators, effect-wrapped chains.
///
/// Implementations mutate only their own internal state (oscillator phase,
/// envelope position, delay-line contents) and must never panic in the
/// steady-state render path; an internal fault should surface as
/// `is_done() == true` so the mixer can retire the voice silently.
pub trait SignalSource: Send {
    /// Write up to `count` frames into `out[offset..offset + count]` and
    /// return the number of frames actually written. Nothing outside that
    /// range may be touched.
    ///
    /// Safe to call after `is_done()` turns true: writes nothing, returns 0.
    fn render(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize;

    /// True once the source has no more signal to produce.
    fn is_done(&self) -> bool;
}

/// Allow boxed sources to be used as sources (for dynamic dispatch).
impl SignalSource for Box<dyn SignalSource> {
    fn render(&mut self, out: &mut [f32], offset: usize, count: usize) -> usize {
        (**self).render(out, offset, count)
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}
