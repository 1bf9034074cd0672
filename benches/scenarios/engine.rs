//! Benchmarks for a full engine block: events, voices and the effect chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::{
    AudioBuffer, FilterDesign, SynthConfig, SynthEngine, SynthMessage, TimedMessage, Waveform,
};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        for design in [FilterDesign::Biquad, FilterDesign::MovingAverage] {
            let mut engine = SynthEngine::new(SynthConfig::default().with_filter_design(design))
                .expect("default config");
            engine.prepare(sample_rate, size).expect("prepare");

            let params = engine.params();
            params.set_waveform(Waveform::Sawtooth);
            params.set_cutoff(0.5);
            params.set_resonance(0.4);
            params.set_delay_feedback(0.4);
            params.set_lfo_rate(0.3);
            params.set_lfo_enabled(true);
            params.set_sub_osc_enabled(true);

            let chord: Vec<TimedMessage> = [48, 55, 60]
                .into_iter()
                .map(|note| {
                    TimedMessage::new(
                        0,
                        SynthMessage::NoteOn {
                            note,
                            velocity: 0.9,
                        },
                    )
                })
                .collect();
            engine.process_block(&mut buffer, &chord, sample_rate);

            group.bench_with_input(
                BenchmarkId::new(format!("{design:?}_chord"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        engine.process_block(black_box(&mut buffer), &[], sample_rate);
                    })
                },
            );
        }
    }

    group.finish();
}
