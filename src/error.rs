//! Error types for tablesynth.
//!
//! Errors only surface from construction and preparation. The render path
//! never returns one: anything unexpected there degrades to silence.

use thiserror::Error;

/// Result type alias for tablesynth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or preparing the synth.
#[derive(Debug, Error)]
pub enum Error {
    /// Sample rate was zero, negative or not finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Base frequency for a wavetable set was zero, negative or above Nyquist.
    #[error("invalid base frequency {base_freq} Hz for sample rate {sample_rate} Hz")]
    InvalidBaseFrequency { base_freq: f32, sample_rate: f32 },

    /// The wavetable set is full; the extra table was rejected.
    #[error("wavetable set is full ({capacity} slots)")]
    TableCapacityExceeded { capacity: usize },

    /// FFT length must be a power of two.
    #[error("FFT length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Patch could not be serialized or parsed.
    #[cfg(feature = "serde")]
    #[error("patch error: {0}")]
    Patch(#[from] serde_json::Error),
}
