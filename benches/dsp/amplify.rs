//! Benchmarks for gain and tremolo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::dsp::{amplify, lfo::Tremolo};

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                amplify::apply_gain(black_box(&mut signal_copy), black_box(0.5))
            })
        });

        // per-sample sin() for the tremolo gain
        let mut tremolo = Tremolo::new();
        tremolo.set_rate_hz(5.0, 48_000.0);
        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("tremolo", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                for sample in signal_copy.iter_mut() {
                    *sample *= tremolo.next_gain();
                }
                black_box(&signal_copy);
            })
        });
    }

    group.finish();
}
