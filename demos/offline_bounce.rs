//! Render a high sawtooth offline with both oscillator modes and compare how
//! much energy lands above the fundamental's harmonic series.
//!
//! Run with: cargo run --example offline_bounce

use tablesynth::{
    analysis::magnitude_spectrum, AudioBuffer, OscillatorMode, SynthConfig, SynthEngine,
    SynthMessage, TimedMessage, Waveform,
};

const SAMPLE_RATE: f32 = 44_100.0;
const FRAMES: usize = 8_192;

fn bounce(mode: OscillatorMode, note: u8) -> tablesynth::Result<AudioBuffer> {
    let mut engine = SynthEngine::new(SynthConfig::default().with_oscillator_mode(mode))?;
    engine.prepare(SAMPLE_RATE, 1024)?;
    engine.params().set_waveform(Waveform::Sawtooth);

    let mut output = AudioBuffer::new(1, FRAMES);
    let events = [TimedMessage::new(
        0,
        SynthMessage::NoteOn {
            note,
            velocity: 1.0,
        },
    )];
    engine.process_block(&mut output, &events, SAMPLE_RATE);
    Ok(output)
}

/// Fraction of spectral energy that is not near a multiple of `fundamental_bin`.
fn inharmonic_ratio(spectrum: &[f32], fundamental_bin: f32) -> f32 {
    let mut total = 0.0;
    let mut stray = 0.0;
    for (bin, &m) in spectrum.iter().enumerate().skip(1) {
        let energy = m * m;
        total += energy;
        let harmonic = bin as f32 / fundamental_bin;
        if (harmonic - harmonic.round()).abs() * fundamental_bin > 3.0 {
            stray += energy;
        }
    }
    if total > 0.0 {
        stray / total
    } else {
        0.0
    }
}

fn main() -> tablesynth::Result<()> {
    let note = 96; // ~2093 Hz
    let freq = 440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0);
    let fundamental_bin = freq * FRAMES as f32 / SAMPLE_RATE;

    for mode in [OscillatorMode::Wavetable, OscillatorMode::Additive] {
        let output = bounce(mode, note)?;
        let spectrum = magnitude_spectrum(&output.buffers[0]);
        println!(
            "{mode:?}: rendered {} samples, peak {:.3}, inharmonic energy {:.2}%",
            output.buffers[0].len(),
            output.peak(),
            100.0 * inharmonic_ratio(&spectrum, fundamental_bin)
        );
    }
    Ok(())
}
