//! Benchmarks for the low-pass filter designs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::{
    dsp::filter::{Biquad, LowPass},
    FilterDesign,
};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = Biquad::new();
        filter.set_params(sample_rate, 1000.0, 4.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("biquad", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // cutoff moves every block, as it does under a knob sweep
        let mut filter = Biquad::new();
        let mut cutoff = 600.0;
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("biquad_sweep", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 10_000.0 { 600.0 } else { cutoff * 1.01 };
                filter.set_params(sample_rate, cutoff, 0.707);
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        let mut filter = LowPass::new(FilterDesign::MovingAverage, size);
        filter.configure(sample_rate, 1000.0, 0.707, size);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("moving_average", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
