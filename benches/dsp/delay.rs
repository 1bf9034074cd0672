//! Benchmarks for the feedback delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::dsp::delay::FeedbackDelay;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    let capacities: &[usize] = &[
        480,    // 10ms at 48kHz
        12_000, // default
        48_000, // 1 second at 48kHz
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &capacity in capacities {
            let mut delay = FeedbackDelay::new(capacity);
            delay.set_feedback(0.5);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{capacity}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
