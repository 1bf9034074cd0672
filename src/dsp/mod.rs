//! Low-level DSP primitives.
//!
//! Everything here is allocation-free once constructed, so it can live
//! inside voices and the output chain. Table building (`wavetable`, `fft`)
//! is the exception: it allocates and belongs at prepare time.

/// Truncated Fourier-series fallback waveforms.
pub mod additive;
/// Gain stage.
pub mod amplify;
/// Recirculating feedback delay.
pub mod delay;
/// Radix-2 FFT used to build tables.
pub mod fft;
/// Biquad and moving-average low-pass filters.
pub mod filter;
/// Tremolo LFO.
pub mod lfo;
/// Waveform identity and the wavetable oscillator.
pub mod oscillator;
/// Band-limited wavetable sets.
pub mod wavetable;

pub use oscillator::{Waveform, WavetableOsc};
pub use wavetable::{WaveTable, WaveTableSet, WAVE_TABLE_SLOTS};
