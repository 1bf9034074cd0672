//! Band-limited wavetable synthesizer core.
//!
//! A fixed pool of voices plays sine, square, triangle or sawtooth notes from
//! per-octave wavetables (or a plain Fourier-series fallback), then runs the
//! mix through gain, a low-pass filter, tremolo and a feedback delay.
//!
//! ```
//! use tablesynth::{AudioBuffer, SynthConfig, SynthEngine, SynthMessage, TimedMessage};
//!
//! let mut engine = SynthEngine::new(SynthConfig::default())?;
//! engine.prepare(44_100.0, 512)?;
//!
//! let mut buffer = AudioBuffer::new(2, 512);
//! let note = TimedMessage::new(0, SynthMessage::NoteOn { note: 69, velocity: 0.8 });
//! engine.process_block(&mut buffer, &[note], 44_100.0);
//! assert!(buffer.peak() > 0.0);
//! # Ok::<(), tablesynth::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod io;
pub mod params;
pub mod patch;
pub mod synth;

pub use config::{FilterDesign, OscillatorMode, SynthConfig, TableSizing};
pub use dsp::oscillator::Waveform;
pub use engine::{SignalChain, SynthEngine};
pub use error::{Error, Result};
pub use io::AudioBuffer;
pub use params::{ParamSnapshot, SynthParams};
pub use patch::Patch;
pub use synth::message::{SynthMessage, TimedMessage};

/// Longest block the engine renders in one pass; longer host blocks are split.
pub const MAX_BLOCK_SIZE: usize = 2048;
