//! Benchmarks for the scheduling mixer's read path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tailverb::synth::{NoteExpression, ScheduledMixer, ScheduledNote};
use tailverb::voices::ToneVoice;

use crate::BLOCK_SIZES;

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/mixer");

    let sample_rate = 44_100.0;

    for &size in BLOCK_SIZES {
        for &voices in &[1usize, 8, 32] {
            group.bench_with_input(
                BenchmarkId::new(format!("{}_voices", voices), size),
                &size,
                |b, _| {
                    // Voices long enough that none retire during the run
                    let mut mixer = ScheduledMixer::new();
                    for i in 0..voices {
                        let note =
                            NoteExpression::new(48 + (i % 24) as u8, 0, u64::MAX / 2, 100);
                        mixer.schedule(ScheduledNote::new(
                            note,
                            ToneVoice::new(&note, sample_rate),
                        ));
                    }
                    let mut out = vec![0.0f32; size];

                    b.iter(|| {
                        mixer.read(black_box(&mut out), 0, size);
                        out[0]
                    })
                },
            );
        }
    }

    group.finish();
}
