//! Persisted synth state.
//!
//! A [`Patch`] is a flat record of every user-facing parameter. Loading is
//! forgiving: any field missing from the JSON keeps its default, so patches
//! saved by older builds still open.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::oscillator::Waveform,
    params::{ParamSnapshot, SynthParams},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub name: String,
    pub gain: f32,
    pub delay_feedback: f32,
    pub cutoff: f32,
    pub resonance: f32,
    pub lfo_rate: f32,
    pub lfo_enabled: bool,
    pub sub_osc_enabled: bool,
    pub waveform: Waveform,
}

impl Default for Patch {
    fn default() -> Self {
        Self::from_snapshot("init", &ParamSnapshot::default())
    }
}

impl Patch {
    pub fn from_snapshot(name: impl Into<String>, snapshot: &ParamSnapshot) -> Self {
        Self {
            name: name.into(),
            gain: snapshot.gain,
            delay_feedback: snapshot.delay_feedback,
            cutoff: snapshot.cutoff,
            resonance: snapshot.resonance,
            lfo_rate: snapshot.lfo_rate,
            lfo_enabled: snapshot.lfo_enabled,
            sub_osc_enabled: snapshot.sub_osc_enabled,
            waveform: snapshot.waveform,
        }
    }

    /// Capture the current live parameters.
    pub fn capture(name: impl Into<String>, params: &SynthParams) -> Self {
        Self::from_snapshot(name, &params.snapshot())
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            gain: self.gain,
            delay_feedback: self.delay_feedback,
            cutoff: self.cutoff,
            resonance: self.resonance,
            lfo_rate: self.lfo_rate,
            lfo_enabled: self.lfo_enabled,
            sub_osc_enabled: self.sub_osc_enabled,
            waveform: self.waveform,
        }
    }

    /// Push every value into the live parameters. Out-of-range values are
    /// clamped by the setters.
    pub fn apply_to(&self, params: &SynthParams) {
        params.apply(&self.snapshot());
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
