//! Lock-free parameter block shared between the control side and the audio
//! callback.
//!
//! Any thread may call the setters. The engine reads everything once at the
//! top of each block through [`SynthParams::snapshot`], so a block never sees
//! a half-applied change of a single value.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use atomic_float::AtomicF32;

use crate::dsp::oscillator::Waveform;

/// Plain copy of every parameter, taken once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub gain: f32,
    pub delay_feedback: f32,
    pub cutoff: f32,
    pub resonance: f32,
    pub lfo_rate: f32,
    pub lfo_enabled: bool,
    pub sub_osc_enabled: bool,
    pub waveform: Waveform,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            gain: 1.0,
            delay_feedback: 0.0,
            cutoff: 1.0,
            resonance: 0.0,
            lfo_rate: 0.0,
            lfo_enabled: false,
            sub_osc_enabled: false,
            waveform: Waveform::Sine,
        }
    }
}

#[derive(Debug)]
pub struct SynthParams {
    gain: AtomicF32,
    delay_feedback: AtomicF32,
    cutoff: AtomicF32,
    resonance: AtomicF32,
    lfo_rate: AtomicF32,
    lfo_enabled: AtomicBool,
    sub_osc_enabled: AtomicBool,
    waveform: AtomicU8,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self::from_snapshot(&ParamSnapshot::default())
    }
}

/// Clamp to `[lo, hi]`; non-finite input keeps `current`.
#[inline]
fn sanitize(value: f32, lo: f32, hi: f32, current: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        current
    }
}

impl SynthParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &ParamSnapshot) -> Self {
        let params = Self {
            gain: AtomicF32::new(1.0),
            delay_feedback: AtomicF32::new(0.0),
            cutoff: AtomicF32::new(1.0),
            resonance: AtomicF32::new(0.0),
            lfo_rate: AtomicF32::new(0.0),
            lfo_enabled: AtomicBool::new(false),
            sub_osc_enabled: AtomicBool::new(false),
            waveform: AtomicU8::new(Waveform::Sine.index() as u8),
        };
        params.apply(snapshot);
        params
    }

    /// Store every field of `snapshot`.
    pub fn apply(&self, snapshot: &ParamSnapshot) {
        self.set_gain(snapshot.gain);
        self.set_delay_feedback(snapshot.delay_feedback);
        self.set_cutoff(snapshot.cutoff);
        self.set_resonance(snapshot.resonance);
        self.set_lfo_rate(snapshot.lfo_rate);
        self.set_lfo_enabled(snapshot.lfo_enabled);
        self.set_sub_osc_enabled(snapshot.sub_osc_enabled);
        self.set_waveform(snapshot.waveform);
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            gain: self.gain.load(Ordering::Acquire),
            delay_feedback: self.delay_feedback.load(Ordering::Acquire),
            cutoff: self.cutoff.load(Ordering::Acquire),
            resonance: self.resonance.load(Ordering::Acquire),
            lfo_rate: self.lfo_rate.load(Ordering::Acquire),
            lfo_enabled: self.lfo_enabled.load(Ordering::Acquire),
            sub_osc_enabled: self.sub_osc_enabled.load(Ordering::Acquire),
            waveform: Waveform::from_index(self.waveform.load(Ordering::Acquire)),
        }
    }

    /// Output gain, 0.0 or more (1.0 = unity).
    pub fn set_gain(&self, gain: f32) {
        let current = self.gain.load(Ordering::Relaxed);
        self.gain
            .store(sanitize(gain, 0.0, f32::MAX, current), Ordering::Release);
    }

    /// Delay feedback in [0, 1].
    pub fn set_delay_feedback(&self, feedback: f32) {
        let current = self.delay_feedback.load(Ordering::Relaxed);
        self.delay_feedback
            .store(sanitize(feedback, 0.0, 1.0, current), Ordering::Release);
    }

    /// Filter cutoff knob in [0, 1].
    pub fn set_cutoff(&self, cutoff: f32) {
        let current = self.cutoff.load(Ordering::Relaxed);
        self.cutoff
            .store(sanitize(cutoff, 0.0, 1.0, current), Ordering::Release);
    }

    /// Filter resonance knob in [0, 1].
    pub fn set_resonance(&self, resonance: f32) {
        let current = self.resonance.load(Ordering::Relaxed);
        self.resonance
            .store(sanitize(resonance, 0.0, 1.0, current), Ordering::Release);
    }

    /// Tremolo rate knob in [0, 1].
    pub fn set_lfo_rate(&self, rate: f32) {
        let current = self.lfo_rate.load(Ordering::Relaxed);
        self.lfo_rate
            .store(sanitize(rate, 0.0, 1.0, current), Ordering::Release);
    }

    pub fn set_lfo_enabled(&self, enabled: bool) {
        self.lfo_enabled.store(enabled, Ordering::Release);
    }

    pub fn set_sub_osc_enabled(&self, enabled: bool) {
        self.sub_osc_enabled.store(enabled, Ordering::Release);
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform
            .store(waveform.index() as u8, Ordering::Release);
    }

    pub fn gain(&self) -> f32 {
        self.gain.load(Ordering::Acquire)
    }

    pub fn delay_feedback(&self) -> f32 {
        self.delay_feedback.load(Ordering::Acquire)
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff.load(Ordering::Acquire)
    }

    pub fn resonance(&self) -> f32 {
        self.resonance.load(Ordering::Acquire)
    }

    pub fn lfo_rate(&self) -> f32 {
        self.lfo_rate.load(Ordering::Acquire)
    }

    pub fn lfo_enabled(&self) -> bool {
        self.lfo_enabled.load(Ordering::Acquire)
    }

    pub fn sub_osc_enabled(&self) -> bool {
        self.sub_osc_enabled.load(Ordering::Acquire)
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_index(self.waveform.load(Ordering::Acquire))
    }
}
