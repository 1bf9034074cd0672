//! Build-time policies for the synth.
//!
//! Every choice that changes *how* sound is generated (tables vs. additive
//! series, biquad vs. moving average, table sizing) lives here so both
//! variants can be constructed side by side in the same binary.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How voices compute their raw waveform samples.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorMode {
    /// Band-limited wavetables built once at prepare time.
    #[default]
    Wavetable,
    /// Truncated Fourier series evaluated every sample. Not band-limited.
    Additive,
}

/// Which low-pass design the signal chain runs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterDesign {
    /// RBJ cookbook low-pass, reconfigured when cutoff or resonance change.
    #[default]
    Biquad,
    /// Boxcar average whose window length follows the cutoff.
    MovingAverage,
}

/// Length policy for the tables of one wavetable set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSizing {
    /// Every octave keeps the length of the lowest table.
    #[default]
    ConstantSize,
    /// Halve the length each octave while it is larger than `min_len`,
    /// keeping the oversampling ratio roughly constant.
    ConstantOversampling { min_len: usize },
}

/// Static configuration for [`SynthEngine`](crate::engine::SynthEngine).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub oscillator_mode: OscillatorMode,
    pub filter_design: FilterDesign,
    pub table_sizing: TableSizing,
    /// Lowest fundamental (Hz) the wavetables are built for.
    pub table_base_freq: f32,
    /// Table oversampling factor on top of the 2x needed for Nyquist.
    pub table_oversampling: usize,
    /// Voices built per waveform. The pool holds four times this many.
    pub voices_per_waveform: usize,
    /// Velocity (0.0-1.0) to level scaling.
    pub velocity_sensitivity: f32,
    /// Per-sample multiplier applied while a voice tails off.
    pub tail_off_decay: f64,
    /// Tail-off factor at which a voice is considered silent.
    pub tail_off_threshold: f64,
    /// Partials summed by the additive fallback.
    pub additive_harmonics: usize,
    /// Delay line length in samples, per channel.
    pub delay_capacity: usize,
    /// Channels the signal chain keeps state for.
    pub max_channels: usize,
    /// Longest block the moving-average window is sized for.
    pub max_block_size: usize,
    /// Transposition of the doubled sub-oscillator note, in semitones.
    pub sub_osc_interval: i8,
    pub cutoff_min_hz: f32,
    pub cutoff_max_hz: f32,
    pub q_min: f32,
    pub q_max: f32,
    pub lfo_min_hz: f32,
    pub lfo_max_hz: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            oscillator_mode: OscillatorMode::Wavetable,
            filter_design: FilterDesign::Biquad,
            table_sizing: TableSizing::ConstantSize,
            table_base_freq: 20.0,
            table_oversampling: 2,
            voices_per_waveform: 5,
            velocity_sensitivity: 0.15,
            tail_off_decay: 0.99,
            tail_off_threshold: 0.005,
            additive_harmonics: 25,
            delay_capacity: 12_000,
            max_channels: 2,
            max_block_size: crate::MAX_BLOCK_SIZE,
            sub_osc_interval: -12,
            cutoff_min_hz: 600.0,
            cutoff_max_hz: 20_000.0,
            q_min: std::f32::consts::FRAC_1_SQRT_2,
            q_max: 12.0,
            lfo_min_hz: 0.1,
            lfo_max_hz: 20.0,
        }
    }
}

impl SynthConfig {
    pub fn with_oscillator_mode(mut self, mode: OscillatorMode) -> Self {
        self.oscillator_mode = mode;
        self
    }

    pub fn with_filter_design(mut self, design: FilterDesign) -> Self {
        self.filter_design = design;
        self
    }

    pub fn with_table_sizing(mut self, sizing: TableSizing) -> Self {
        self.table_sizing = sizing;
        self
    }

    pub fn with_voices_per_waveform(mut self, voices: usize) -> Self {
        self.voices_per_waveform = voices;
        self
    }

    pub fn with_delay_capacity(mut self, samples: usize) -> Self {
        self.delay_capacity = samples;
        self
    }

    pub fn with_max_block_size(mut self, samples: usize) -> Self {
        self.max_block_size = samples;
        self
    }

    /// Reject configurations that cannot produce a working engine.
    pub fn validate(&self) -> Result<()> {
        if self.voices_per_waveform == 0 {
            return Err(Error::InvalidConfig("voices_per_waveform must be > 0".into()));
        }
        if self.delay_capacity == 0 {
            return Err(Error::InvalidConfig("delay_capacity must be > 0".into()));
        }
        if self.max_channels == 0 {
            return Err(Error::InvalidConfig("max_channels must be > 0".into()));
        }
        if self.max_block_size == 0 {
            return Err(Error::InvalidConfig("max_block_size must be > 0".into()));
        }
        if self.table_oversampling == 0 || !self.table_oversampling.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "table_oversampling must be a power of two, got {}",
                self.table_oversampling
            )));
        }
        if !(self.table_base_freq > 0.0 && self.table_base_freq.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "table_base_freq must be positive, got {}",
                self.table_base_freq
            )));
        }
        if !(0.0..1.0).contains(&self.tail_off_decay) {
            return Err(Error::InvalidConfig(format!(
                "tail_off_decay must be in [0, 1), got {}",
                self.tail_off_decay
            )));
        }
        if !(self.cutoff_min_hz > 0.0 && self.cutoff_min_hz < self.cutoff_max_hz) {
            return Err(Error::InvalidConfig("cutoff range must satisfy 0 < min < max".into()));
        }
        if !(self.q_min > 0.0 && self.q_min <= self.q_max) {
            return Err(Error::InvalidConfig("q range must satisfy 0 < min <= max".into()));
        }
        if !(self.lfo_min_hz >= 0.0 && self.lfo_min_hz <= self.lfo_max_hz) {
            return Err(Error::InvalidConfig("lfo range must satisfy 0 <= min <= max".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SynthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_voices() {
        let config = SynthConfig::default().with_voices_per_waveform(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_odd_oversampling() {
        let config = SynthConfig {
            table_oversampling: 3,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_cutoff_range() {
        let config = SynthConfig {
            cutoff_min_hz: 5_000.0,
            cutoff_max_hz: 1_000.0,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
