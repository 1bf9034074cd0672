//! Offline spectrum inspection for wavetables and rendered audio.
//!
//! Uses `rustfft` rather than the crate's own radix-2 transform so the
//! checks are independent of the code that built the tables.

use rustfft::{num_complex::Complex, FftPlanner};

/// Magnitudes of bins `0..=N/2` of the forward transform of `samples`.
///
/// Magnitudes are scaled by `2/N`, so a full-scale sine at bin k reads ~1.0.
/// Allocates; not for the audio thread.
pub fn magnitude_spectrum(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    let norm = 2.0 / n as f64;
    buffer[..=n / 2]
        .iter()
        .map(|c| (c.norm() * norm) as f32)
        .collect()
}

/// Sum of squared magnitudes in bins strictly above `bin`.
pub fn energy_above_bin(spectrum: &[f32], bin: usize) -> f32 {
    spectrum
        .iter()
        .skip(bin + 1)
        .map(|m| m * m)
        .sum()
}

/// Highest bin whose magnitude reaches `threshold`, if any.
pub fn highest_active_bin(spectrum: &[f32], threshold: f32) -> Option<usize> {
    spectrum.iter().rposition(|&m| m >= threshold)
}
