//! Benchmarks for comb filter processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tailverb::dsp::comb::CombFilter;

use crate::BLOCK_SIZES;

pub fn bench_comb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/comb");

    let sample_rate = 44_100.0;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

        // Static delay: integer read, no interpolation
        let mut comb = CombFilter::new(1_116, 0.84, 0.2);
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += comb.process(black_box(sample));
                }
                sum
            })
        });

        // Modulated delay: sin() plus a lerp per sample
        let mut comb = CombFilter::modulated(1_116, 0.84, 0.2, 0.41, 2.5, sample_rate);
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += comb.process(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}
