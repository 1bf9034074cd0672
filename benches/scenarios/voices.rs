//! Benchmarks for the voice pool.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use tablesynth::{
    dsp::WaveTableSet, synth::VoicePool, AudioBuffer, OscillatorMode, SynthConfig, TableSizing,
    Waveform,
};

use crate::BLOCK_SIZES;

fn tables(sample_rate: f32) -> [Option<Arc<WaveTableSet>>; 4] {
    Waveform::ALL.map(|waveform| {
        (waveform != Waveform::Sine).then(|| {
            Arc::new(
                WaveTableSet::build(waveform, 20.0, sample_rate, TableSizing::ConstantSize, 2)
                    .expect("tables"),
            )
        })
    })
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let sample_rate = 48_000.0;
    let chord = [48, 55, 60, 64, 67];

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        for waveform in Waveform::ALL {
            let config = SynthConfig::default();
            let mut pool = VoicePool::new(&config, &tables(sample_rate), sample_rate);
            pool.set_playable(waveform);
            for note in chord {
                pool.note_on(note, 0.9);
            }

            group.bench_with_input(
                BenchmarkId::new(format!("wavetable_{waveform:?}_x5"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.clear();
                        pool.render(black_box(&mut buffer), 0, size);
                    })
                },
            );
        }

        // additive fallback, the cost the tables exist to avoid
        let config = SynthConfig::default().with_oscillator_mode(OscillatorMode::Additive);
        let mut pool = VoicePool::new(&config, &[None, None, None, None], sample_rate);
        pool.set_playable(Waveform::Sawtooth);
        for note in chord {
            pool.note_on(note, 0.9);
        }
        group.bench_with_input(
            BenchmarkId::new("additive_Sawtooth_x5", size),
            &size,
            |b, _| {
                b.iter(|| {
                    buffer.clear();
                    pool.render(black_box(&mut buffer), 0, size);
                })
            },
        );
    }

    group.finish();
}
