pub mod dsp; // Realtime-safe filter primitives and the reverb network
pub mod synth; // Note scheduling, signal sources, and the mixer
pub mod voices; // Concrete signal sources (tone, noise, effect sends)

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
