//! Reverb Effect - the Schroeder Network
//!
//! A bank of parallel comb filters followed by a chain of series all-pass
//! filters, with a one-pole lowpass shaping the input before it enters the
//! diffuse network.
//!
//! # Architecture
//!
//! ```text
//! Input ──→ [Lowpass] ──┬──→ [Comb 1] ──┐
//!                       ├──→ [Comb 2] ──┤
//!                       ├──→   ...    ──┼──→ (avg) ──→ [AP 1] → [AP 2] → ... ──→ wet
//!                       └──→ [Comb N] ──┘
//!
//! out = dry·input + wet_gain·wet
//! ```
//!
//! Comb delay lengths come from a fixed table of mutually-prime values so
//! no two combs resonate at aligned frequencies. The comb outputs are
//! AVERAGED, not summed: overall gain stays bounded regardless of how many
//! combs run, which makes the comb count a pure CPU/density knob.
//!
//! # Velocity
//!
//! The wet gain can track note velocity. When `velocity_affects_mix` is
//! set, the normalized velocity passes through `mix_velocity_curve` and
//! scales the wet level per call - soft notes sit drier in the mix, hard
//! notes bloom.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::allpass::AllpassFilter;
use crate::dsp::comb::CombFilter;
use crate::dsp::lowpass::{OnePoleLowpass, DEFAULT_CUTOFF_HZ};
use crate::DEFAULT_SAMPLE_RATE;

/// Comb delay lengths in samples at 44.1 kHz. Mutually-prime-ish values
/// (freeverb lineage) rescaled to the configured sample rate.
const COMB_DELAYS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// All-pass delay lengths in samples at 44.1 kHz.
const ALLPASS_DELAYS: [usize; 6] = [225, 341, 441, 556, 605, 667];

/// Per-comb LFO rates in Hz, cycled by comb index so neighboring combs
/// never wobble in lockstep.
const LFO_RATES_HZ: [f32; 3] = [0.31, 0.41, 0.53];

/// Modulation depth in samples, shared by all modulated combs.
const LFO_DEPTH_SAMPLES: f32 = 2.5;

/// Maps normalized velocity [0, 1] to a wet-mix scalar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default)]
pub enum MixCurve {
    /// Identity: wet level tracks velocity directly.
    #[default]
    Linear,
    /// Quadratic ease-in: quiet notes stay much drier.
    EaseIn,
    /// Quadratic ease-out: reverb blooms early.
    EaseOut,
    /// Smoothstep between the two.
    EaseInOut,
    /// Caller-supplied curve.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(fn(f32) -> f32),
}

impl MixCurve {
    pub fn apply(&self, velocity: f32) -> f32 {
        let v = velocity.clamp(0.0, 1.0);
        match self {
            MixCurve::Linear => v,
            MixCurve::EaseIn => v * v,
            MixCurve::EaseOut => 1.0 - (1.0 - v) * (1.0 - v),
            MixCurve::EaseInOut => v * v * (3.0 - 2.0 * v),
            MixCurve::Custom(f) => f(v),
        }
    }
}

/// Construction parameters for [`ReverbEffect`].
///
/// All fields are validated or clamped at construction time; nothing here
/// can make the per-sample path fail.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct ReverbSettings {
    /// Parallel comb count. Clamped to the delay table length.
    pub num_combs: usize,
    /// Series all-pass count. Clamped to the delay table length.
    pub num_allpasses: usize,
    /// Comb feedback (decay time). Clamped below 1.0 for stability.
    pub feedback: f32,
    /// All-pass coefficient (0.0 = discrete echoes, 0.9 = dense wash).
    pub diffusion: f32,
    /// High-frequency absorption inside the comb feedback loops.
    pub damping: f32,
    /// Wet output level.
    pub wet: f32,
    /// Dry output level.
    pub dry: f32,
    /// Input tone-shaping cutoff. Non-positive values fall back to 12 kHz.
    pub input_lowpass_hz: f32,
    /// Scale the wet level by the note velocity through `mix_velocity_curve`.
    pub velocity_affects_mix: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub mix_velocity_curve: MixCurve,
    /// Enable LFO delay modulation on the combs (smoother, costs CPU).
    pub enable_modulation: bool,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            num_combs: 6,
            num_allpasses: 4,
            feedback: 0.84,
            diffusion: 0.5,
            damping: 0.2,
            wet: 0.3,
            dry: 0.7,
            input_lowpass_hz: DEFAULT_CUTOFF_HZ,
            velocity_affects_mix: false,
            mix_velocity_curve: MixCurve::Linear,
            enable_modulation: false,
        }
    }
}

/// A complete mono reverb unit.
///
/// Owns its filter bank exclusively; delay buffers are allocated once at
/// construction, so `process` and `render` are realtime-safe. `Clone`
/// deep-copies filter state as well as settings: a clone produces an
/// identical output stream until one instance diverges.
#[derive(Clone)]
pub struct ReverbEffect {
    settings: ReverbSettings,
    input_lowpass: OnePoleLowpass,
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
    comb_scale: f32,
}

impl ReverbEffect {
    /// Build a reverb from settings at the given sample rate.
    ///
    /// Requesting more combs or all-passes than the built-in delay tables
    /// provide clamps to the table length; density degrades, construction
    /// never fails.
    pub fn new(settings: ReverbSettings, sample_rate: f32) -> Self {
        let sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };
        let num_combs = settings.num_combs.clamp(1, COMB_DELAYS.len());
        let num_allpasses = settings.num_allpasses.clamp(1, ALLPASS_DELAYS.len());
        let scale = sample_rate / DEFAULT_SAMPLE_RATE;

        let combs = COMB_DELAYS[..num_combs]
            .iter()
            .enumerate()
            .map(|(i, &delay)| {
                let delay = ((delay as f32 * scale) as usize).max(1);
                if settings.enable_modulation {
                    CombFilter::modulated(
                        delay,
                        settings.feedback,
                        settings.damping,
                        LFO_RATES_HZ[i % LFO_RATES_HZ.len()],
                        LFO_DEPTH_SAMPLES,
                        sample_rate,
                    )
                } else {
                    CombFilter::new(delay, settings.feedback, settings.damping)
                }
            })
            .collect();

        let allpasses = ALLPASS_DELAYS[..num_allpasses]
            .iter()
            .map(|&delay| {
                let delay = ((delay as f32 * scale) as usize).max(1);
                AllpassFilter::new(delay, settings.diffusion)
            })
            .collect();

        Self {
            settings,
            input_lowpass: OnePoleLowpass::new(settings.input_lowpass_hz, sample_rate),
            combs,
            allpasses,
            comb_scale: 1.0 / num_combs as f32,
        }
    }

    pub fn settings(&self) -> &ReverbSettings {
        &self.settings
    }

    /// Number of combs actually running (after table clamping).
    pub fn num_combs(&self) -> usize {
        self.combs.len()
    }

    /// Number of all-passes actually running (after table clamping).
    pub fn num_allpasses(&self) -> usize {
        self.allpasses.len()
    }

    /// Change the decay time on the fly. Forwards to every comb and keeps
    /// the settings snapshot (and the `tail_samples` estimate) in sync.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.settings.feedback = feedback.clamp(0.0, 0.99);
        for comb in &mut self.combs {
            comb.set_feedback(self.settings.feedback);
        }
    }

    /// Change high-frequency absorption on the fly.
    pub fn set_damping(&mut self, damping: f32) {
        self.settings.damping = damping.clamp(0.0, 1.0);
        for comb in &mut self.combs {
            comb.set_damp(self.settings.damping);
        }
    }

    /// Change the all-pass coefficient on the fly.
    pub fn set_diffusion(&mut self, diffusion: f32) {
        self.settings.diffusion = diffusion.clamp(0.0, 0.9);
        for allpass in &mut self.allpasses {
            allpass.set_diffusion(self.settings.diffusion);
        }
    }

    /// Rough audible tail length: samples until the longest comb loop has
    /// decayed below -60 dB. Effect-send voices use this to decide how long
    /// to keep rendering after their dry source finishes.
    pub fn tail_samples(&self) -> u64 {
        let longest = self.combs.iter().map(CombFilter::delay).max().unwrap_or(1);
        let feedback = self.settings.feedback.clamp(0.01, 0.99);
        let loops = (0.001_f32.ln() / feedback.ln()).ceil().max(1.0);
        longest as u64 * loops as u64
    }

    /// Process one sample.
    ///
    /// `velocity_norm` is the triggering note's normalized velocity; it is
    /// ignored unless `velocity_affects_mix` is set.
    pub fn process(&mut self, input: f32, velocity_norm: f32) -> f32 {
        // Tone-shape the dry input before it enters the diffuse network
        let shaped = self.input_lowpass.process(input);

        // Parallel combs, averaged so gain is independent of comb count
        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(shaped);
        }
        wet *= self.comb_scale;

        // Series all-passes multiply echo density
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }

        let wet_gain = if self.settings.velocity_affects_mix {
            self.settings.wet * self.settings.mix_velocity_curve.apply(velocity_norm)
        } else {
            self.settings.wet
        };

        self.settings.dry * input + wet_gain * wet
    }

    /// Process a buffer in place.
    pub fn render(&mut self, buffer: &mut [f32], velocity_norm: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, velocity_norm);
        }
    }

    /// Zero all filter state, keeping the configuration. Call on pool
    /// return so a recycled unit carries no tail from its previous note.
    pub fn reset(&mut self) {
        self.input_lowpass.reset();
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}
