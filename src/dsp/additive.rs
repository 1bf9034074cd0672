//! Truncated Fourier-series waveforms, evaluated per sample.
//!
//! This is the fallback path for [`OscillatorMode::Additive`](crate::config::OscillatorMode).
//! Nothing here is band-limited: high notes with many terms will alias.
//! It costs `harmonics` sine calls per sample, so keep the term count small.

use std::f64::consts::PI;

use crate::dsp::oscillator::Waveform;

/// Loudness trim so the square sits level with the other shapes.
const SQUARE_TRIM: f64 = 0.75;

/// One sample of `waveform` at `angle` (radians), summing `harmonics` terms.
///
/// ```
/// use tablesynth::dsp::{additive::additive_sample, oscillator::Waveform};
/// let s = additive_sample(Waveform::Sine, std::f64::consts::FRAC_PI_2, 25);
/// assert!((s - 1.0).abs() < 1e-12);
/// ```
pub fn additive_sample(waveform: Waveform, angle: f64, harmonics: usize) -> f64 {
    match waveform {
        Waveform::Sine => angle.sin(),
        Waveform::Square => {
            let sum: f64 = (0..harmonics)
                .map(|k| {
                    let n = (2 * k + 1) as f64;
                    (n * angle).sin() / n
                })
                .sum();
            sum * SQUARE_TRIM
        }
        Waveform::Triangle => {
            let sum: f64 = (0..harmonics)
                .map(|k| {
                    let n = (2 * k + 1) as f64;
                    (PI * n / 2.0).sin() * (n * angle).sin() / (n * n)
                })
                .sum();
            sum * 8.0 / (PI * PI)
        }
        Waveform::Sawtooth => {
            let sum: f64 = (1..=harmonics)
                .map(|k| {
                    let n = k as f64;
                    (n * angle).sin() / n
                })
                .sum();
            sum / PI
        }
    }
}
