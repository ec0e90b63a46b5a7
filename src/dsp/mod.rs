//! Low-level DSP primitives used by the reverb network and signal sources.
//!
//! These components are allocation-free on the per-sample path and
//! realtime-safe, making them safe to embed directly inside voice structs.
//! Delay buffers are allocated once at construction and only ever reset,
//! never resized, while audio is running.

/// Schroeder all-pass diffusion filter.
pub mod allpass;
/// Feedback comb filter with damping and optional LFO-modulated delay.
pub mod comb;
/// Single-pole IIR lowpass for tone shaping.
pub mod lowpass;
/// The composed reverb effect: combs in parallel, all-passes in series.
pub mod reverb;

pub use reverb::{MixCurve, ReverbEffect, ReverbSettings};
