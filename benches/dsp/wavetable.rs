//! Benchmarks for building the band-limited table ladders.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::{dsp::WaveTableSet, TableSizing, Waveform};

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    group.sample_size(20);

    for waveform in [Waveform::Sawtooth, Waveform::Square, Waveform::Triangle] {
        for (label, sizing) in [
            ("constant_size", TableSizing::ConstantSize),
            (
                "constant_oversampling",
                TableSizing::ConstantOversampling { min_len: 64 },
            ),
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("{waveform:?}"), label),
                &sizing,
                |b, &sizing| {
                    b.iter(|| {
                        WaveTableSet::build(
                            black_box(waveform),
                            black_box(20.0),
                            black_box(48_000.0),
                            sizing,
                            2,
                        )
                    })
                },
            );
        }
    }

    group.finish();
}
