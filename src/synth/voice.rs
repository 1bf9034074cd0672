use std::{f64::consts::TAU, sync::Arc};

use crate::{
    config::{OscillatorMode, SynthConfig},
    dsp::{additive::additive_sample, oscillator::Waveform, wavetable::WaveTableSet, WavetableOsc},
    io::{converter::midi_note_to_freq, AudioBuffer},
};

/*
Voice Lifecycle
===============

            note-on                 note-off (tail)
    Idle ───────────▶ Sounding ─────────────────────▶ TailingOff
     ▲                    │                               │
     │   note-off (hard)  │        tail_off <= 0.005      │
     └────────────────────┴───────────────────────────────┘

A voice is built for one waveform and only accepts notes for that waveform.
`omega` (radians per sample) is zero exactly when the voice is idle; every
other field is left as-is so a stolen voice can be restarted in place.

Tail-off is a plain exponential: the output is multiplied by a factor that
starts at 1.0 and shrinks by `tail_off_decay` (0.99) every sample. At 44.1 kHz
that reaches the 0.005 threshold after ~530 samples, about 12 ms.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Sounding,
    TailingOff,
}

pub struct Voice {
    waveform: Waveform,
    state: VoiceState,
    note: u8,
    age: u64,
    angle: f64,
    omega: f64,
    level: f32,
    tail_off: f64,
    sample_rate: f64,
    osc: Option<WavetableOsc>,
    mode: OscillatorMode,
    harmonics: usize,
    velocity_sensitivity: f32,
    tail_off_decay: f64,
    tail_off_threshold: f64,
}

impl Voice {
    /// Build an idle voice for `waveform`. `tables` is only used in
    /// wavetable mode; without it the voice falls back to the additive series.
    pub fn new(
        waveform: Waveform,
        tables: Option<Arc<WaveTableSet>>,
        config: &SynthConfig,
        sample_rate: f32,
    ) -> Self {
        let osc = match config.oscillator_mode {
            OscillatorMode::Wavetable => tables.map(WavetableOsc::new),
            OscillatorMode::Additive => None,
        };

        Self {
            waveform,
            state: VoiceState::Idle,
            note: 0,
            age: 0,
            angle: 0.0,
            omega: 0.0,
            level: 0.0,
            tail_off: 0.0,
            sample_rate: sample_rate as f64,
            osc,
            mode: config.oscillator_mode,
            harmonics: config.additive_harmonics,
            velocity_sensitivity: config.velocity_sensitivity,
            tail_off_decay: config.tail_off_decay,
            tail_off_threshold: config.tail_off_threshold,
        }
    }

    /// Start `note`. Returns `false` (and does nothing) if this voice was
    /// built for a different waveform or has no sample rate yet.
    pub fn start_note(&mut self, note: u8, velocity: f32, waveform: Waveform, age: u64) -> bool {
        if waveform != self.waveform || self.sample_rate <= 0.0 {
            return false;
        }

        let freq = midi_note_to_freq(note) as f64;
        self.note = note;
        self.age = age;
        self.angle = 0.0;
        self.level = velocity.clamp(0.0, 1.0) * self.velocity_sensitivity;
        self.tail_off = 0.0;
        self.omega = TAU * freq / self.sample_rate;
        self.state = VoiceState::Sounding;

        if let Some(osc) = self.osc.as_mut() {
            osc.reset_phase();
            osc.set_frequency(freq / self.sample_rate);
        }
        true
    }

    /// Release the note. With `allow_tail_off` the voice fades out over the
    /// next few hundred samples; otherwise it goes idle now.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        match (allow_tail_off, self.state) {
            (_, VoiceState::Idle) => {}
            (true, VoiceState::Sounding) => {
                self.tail_off = 1.0;
                self.state = VoiceState::TailingOff;
            }
            (true, VoiceState::TailingOff) => {}
            (false, _) => self.clear(),
        }
    }

    fn clear(&mut self) {
        self.state = VoiceState::Idle;
        self.omega = 0.0;
        self.tail_off = 0.0;
    }

    #[inline]
    fn raw_sample(&self) -> f64 {
        match (&self.osc, self.waveform) {
            (_, Waveform::Sine) => self.angle.sin(),
            (Some(osc), _) => osc.output() as f64,
            (None, waveform) => additive_sample(waveform, self.angle, self.harmonics),
        }
    }

    /// Add `count` samples starting at frame `start` to every channel.
    pub fn render(&mut self, buffer: &mut AudioBuffer, start: usize, count: usize) {
        if self.state == VoiceState::Idle {
            return;
        }
        let end = (start + count).min(buffer.num_frames());

        for frame in start..end {
            let mut value = self.raw_sample() * self.level as f64;
            if self.state == VoiceState::TailingOff {
                value *= self.tail_off;
            }

            let value = value as f32;
            for channel in buffer.buffers.iter_mut() {
                channel[frame] += value;
            }

            self.angle = (self.angle + self.omega).rem_euclid(TAU);
            if let Some(osc) = self.osc.as_mut() {
                osc.update_phase();
            }

            if self.state == VoiceState::TailingOff {
                self.tail_off *= self.tail_off_decay;
                if self.tail_off <= self.tail_off_threshold {
                    self.clear();
                    break;
                }
            }
        }
    }

    /// Position in the current cycle, in [0, 1).
    pub fn phasor(&self) -> f64 {
        match &self.osc {
            Some(osc) => osc.phasor(),
            None => self.angle / TAU,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate as f64;
        self.clear();
    }

    pub fn uses_wavetable(&self) -> bool {
        self.mode == OscillatorMode::Wavetable && self.osc.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn tail_off(&self) -> f64 {
        self.tail_off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableSizing;
    use approx::assert_abs_diff_eq;

    const SR: f32 = 44_100.0;

    fn saw_voice(config: &SynthConfig) -> Voice {
        let tables = WaveTableSet::build(
            Waveform::Sawtooth,
            config.table_base_freq,
            SR,
            TableSizing::ConstantSize,
            2,
        )
        .unwrap();
        Voice::new(Waveform::Sawtooth, Some(Arc::new(tables)), config, SR)
    }

    #[test]
    fn test_rejects_other_waveform() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        assert!(!voice.start_note(60, 1.0, Waveform::Square, 0));
        assert!(voice.is_idle());
        assert!(voice.start_note(60, 1.0, Waveform::Sawtooth, 0));
        assert_eq!(voice.state(), VoiceState::Sounding);
    }

    #[test]
    fn test_level_follows_velocity() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        voice.start_note(60, 0.5, Waveform::Sawtooth, 0);
        assert_abs_diff_eq!(voice.level(), 0.5 * 0.15, epsilon = 1e-7);
    }

    #[test]
    fn test_a4_phasor_after_one_block() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        voice.start_note(69, 1.0, Waveform::Sawtooth, 0);

        let mut buffer = AudioBuffer::new(1, 100);
        voice.render(&mut buffer, 0, 100);

        let expected = (100.0 * 440.0 / 44_100.0f64).rem_euclid(1.0);
        assert_abs_diff_eq!(voice.phasor(), expected, epsilon = 1e-6);
        assert!(buffer.peak() > 0.0);
    }

    #[test]
    fn test_omega_zero_iff_idle() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        let mut buffer = AudioBuffer::new(2, 256);

        assert!(voice.is_idle() && voice.omega() == 0.0);

        voice.start_note(60, 1.0, Waveform::Sawtooth, 0);
        assert!(!voice.is_idle() && voice.omega() > 0.0);

        voice.stop_note(true);
        voice.render(&mut buffer, 0, 64);
        assert_eq!(voice.state(), VoiceState::TailingOff);
        assert!(voice.omega() > 0.0);

        voice.stop_note(false);
        assert!(voice.is_idle() && voice.omega() == 0.0);
    }

    #[test]
    fn test_tail_off_reaches_idle_after_528_samples() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        voice.start_note(60, 1.0, Waveform::Sawtooth, 0);
        voice.stop_note(true);

        // 0.99^n first drops to 0.005 at n = 528
        let mut buffer = AudioBuffer::new(1, 1024);
        voice.render(&mut buffer, 0, 527);
        assert_eq!(voice.state(), VoiceState::TailingOff);
        voice.render(&mut buffer, 527, 497);
        assert!(voice.is_idle());
        assert!(buffer.buffers[0][528..].iter().all(|&s| s == 0.0));

        // stays idle
        voice.render(&mut buffer, 0, 1024);
        assert!(voice.is_idle());
    }

    #[test]
    fn test_tail_off_envelope_is_monotonic() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        voice.start_note(60, 1.0, Waveform::Sawtooth, 0);
        voice.stop_note(true);

        let mut buffer = AudioBuffer::new(1, 1);
        let mut previous = voice.tail_off();
        while !voice.is_idle() {
            buffer.clear();
            voice.render(&mut buffer, 0, 1);
            assert!(voice.tail_off() < previous);
            previous = voice.tail_off();
        }
    }

    #[test]
    fn test_phase_wraps_above_sample_rate() {
        let config = SynthConfig::default();
        let mut voice = Voice::new(Waveform::Sine, None, &config, 8_000.0);
        voice.start_note(127, 1.0, Waveform::Sine, 0);
        assert!(voice.omega() > TAU);

        let mut buffer = AudioBuffer::new(1, 4096);
        voice.render(&mut buffer, 0, 4096);
        let phasor = voice.phasor();
        assert!((0.0..1.0).contains(&phasor), "phasor {phasor}");
    }

    #[test]
    fn test_second_release_does_not_rearm_tail() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        voice.start_note(60, 1.0, Waveform::Sawtooth, 0);
        voice.stop_note(true);

        let mut buffer = AudioBuffer::new(1, 50);
        voice.render(&mut buffer, 0, 50);
        let tail = voice.tail_off();
        voice.stop_note(true);
        assert_eq!(voice.tail_off(), tail);
    }

    #[test]
    fn test_idle_voice_renders_nothing() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        let mut buffer = AudioBuffer::new(2, 64);
        voice.render(&mut buffer, 0, 64);
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn test_additive_mode_without_tables() {
        let config = SynthConfig::default().with_oscillator_mode(OscillatorMode::Additive);
        let mut voice = Voice::new(Waveform::Square, None, &config, SR);
        assert!(!voice.uses_wavetable());

        voice.start_note(57, 1.0, Waveform::Square, 0);
        let mut buffer = AudioBuffer::new(1, 256);
        voice.render(&mut buffer, 0, 256);
        assert!(buffer.peak() > 0.05);
        assert!(buffer.peak() <= 0.15);

        let expected = (256.0 * 220.0 / 44_100.0f64).rem_euclid(1.0);
        assert_abs_diff_eq!(voice.phasor(), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_render_respects_window() {
        let config = SynthConfig::default();
        let mut voice = saw_voice(&config);
        voice.start_note(72, 1.0, Waveform::Sawtooth, 0);

        let mut buffer = AudioBuffer::new(1, 64);
        voice.render(&mut buffer, 16, 16);
        let ch = &buffer.buffers[0];
        assert!(ch[..16].iter().all(|&s| s == 0.0));
        assert!(ch[32..].iter().all(|&s| s == 0.0));
        assert!(ch[16..32].iter().any(|&s| s != 0.0));
    }
}
