//! Benchmark groups for the core render paths.

mod comb;
mod mixer;
mod reverb;

pub use comb::bench_comb;
pub use mixer::bench_mixer;
pub use reverb::bench_reverb;
