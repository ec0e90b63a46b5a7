//! Benchmarks for the full reverb network.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tailverb::dsp::{ReverbEffect, ReverbSettings};

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    let sample_rate = 44_100.0;

    for &size in BLOCK_SIZES {
        // Impulse-like input with a quiet tail
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        // Default density (6 combs, 4 all-passes, no modulation)
        let mut reverb = ReverbEffect::new(ReverbSettings::default(), sample_rate);
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += reverb.process(black_box(sample), 1.0);
                }
                sum
            })
        });

        // Maximum density with modulated combs
        let settings = ReverbSettings {
            num_combs: 8,
            num_allpasses: 6,
            enable_modulation: true,
            ..Default::default()
        };
        let mut reverb = ReverbEffect::new(settings, sample_rate);
        group.bench_with_input(BenchmarkId::new("dense_modulated", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += reverb.process(black_box(sample), 1.0);
                }
                sum
            })
        });
    }

    group.finish();
}
