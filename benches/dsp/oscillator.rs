//! Benchmarks for wavetable lookup against additive synthesis.

use std::{f64::consts::TAU, hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use tablesynth::{
    dsp::{additive::additive_sample, WaveTableSet, WavetableOsc},
    TableSizing, Waveform,
};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_rate: f32 = 48_000.0;
    let inc = 440.0 / sample_rate as f64;

    let saw = Arc::new(
        WaveTableSet::build(
            Waveform::Sawtooth,
            20.0,
            sample_rate,
            TableSizing::ConstantSize,
            2,
        )
        .expect("sawtooth tables"),
    );

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut osc = WavetableOsc::new(saw.clone());
        osc.set_frequency(inc);
        group.bench_with_input(BenchmarkId::new("wavetable_saw", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.output();
                    osc.update_phase();
                }
                black_box(&buffer);
            })
        });

        // pulse from two saw reads
        let mut osc = WavetableOsc::new(saw.clone());
        osc.set_frequency(inc);
        osc.set_phase_offset(0.25);
        group.bench_with_input(BenchmarkId::new("wavetable_pulse", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.output_minus_offset();
                    osc.update_phase();
                }
                black_box(&buffer);
            })
        });

        // 40 partials at 440 Hz stays under Nyquist
        let mut angle = 0.0f64;
        group.bench_with_input(BenchmarkId::new("additive_saw", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = additive_sample(Waveform::Sawtooth, angle, black_box(40)) as f32;
                    angle = (angle + TAU * inc) % TAU;
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
