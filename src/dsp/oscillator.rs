use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::wavetable::WaveTableSet;

/*
Wavetable Oscillator
====================

A wavetable oscillator plays back one stored cycle of a waveform at any
pitch by walking through the table at a variable speed.

Vocabulary
----------

  phasor      Position inside the current cycle, in [0, 1). 0.25 means a
              quarter of the way through the waveform.

  phase_inc   How far the phasor moves per sample, in cycles/sample. This is
              the normalized frequency: 440 Hz at 44.1 kHz is ~0.00998.

  top_freq    The highest phase_inc a table may be played at before its
              upper harmonics fold back below Nyquist (aliasing).


Table Selection
---------------

A single table cannot serve the whole keyboard: a sawtooth with 700
harmonics sounds great at 20 Hz and aliases badly at 2 kHz. The table set
holds one table per octave, each with half the harmonics of the one below.
Every sample we pick the first table whose top_freq is at or above the
current phase_inc:

    phase_inc:  0.0009   0.0018   0.0036   ...
    table:       [0]      [1]      [2]     ...   (last table if none fits)


Linear Interpolation
--------------------

phasor * len almost never lands exactly on a sample, so we blend the two
neighbours:

    pos  = phasor * len         e.g. 10.3
    s0   = table[10], s1 = table[11]
    out  = s0 + (s1 - s0) * 0.3

The upper neighbour wraps to index 0 at the end of the table.


Pulse Width
-----------

Subtracting a phase-shifted copy of a sawtooth from itself produces a pulse
wave whose duty cycle equals the phase offset. `output_minus_offset` does
exactly that, using the same table for both reads.
*/

/// Waveform identity. Doubles as the capability tag a voice is built for.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
    ];

    pub fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Square => 1,
            Waveform::Triangle => 2,
            Waveform::Sawtooth => 3,
        }
    }

    /// Inverse of [`Waveform::index`]. Out-of-range values fall back to sine.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Waveform::Square,
            2 => Waveform::Triangle,
            3 => Waveform::Sawtooth,
            _ => Waveform::Sine,
        }
    }

    /// Sine-series amplitude of harmonic `k` (k >= 1).
    pub fn harmonic_amplitude(self, k: usize) -> f64 {
        let kf = k as f64;
        match self {
            Waveform::Sine => {
                if k == 1 {
                    1.0
                } else {
                    0.0
                }
            }
            Waveform::Sawtooth => {
                if k % 2 == 1 {
                    1.0 / kf
                } else {
                    -1.0 / kf
                }
            }
            Waveform::Square => {
                if k % 2 == 1 {
                    1.0 / kf
                } else {
                    0.0
                }
            }
            Waveform::Triangle => {
                if k % 2 == 0 {
                    0.0
                } else if (k / 2) % 2 == 0 {
                    1.0 / (kf * kf)
                } else {
                    -1.0 / (kf * kf)
                }
            }
        }
    }
}

/// Phase-accumulating oscillator reading from a shared band-limited table set.
#[derive(Clone)]
pub struct WavetableOsc {
    tables: Arc<WaveTableSet>,
    phasor: f64,
    phase_inc: f64,
    phase_ofs: f64,
}

impl WavetableOsc {
    pub fn new(tables: Arc<WaveTableSet>) -> Self {
        Self {
            tables,
            phasor: 0.0,
            phase_inc: 0.0,
            phase_ofs: 0.5,
        }
    }

    /// Set the normalized frequency (cycles/sample). Keep it in [0, 1).
    #[inline]
    pub fn set_frequency(&mut self, inc: f64) {
        self.phase_inc = inc;
    }

    /// Set the pulse-width offset used by [`output_minus_offset`](Self::output_minus_offset).
    #[inline]
    pub fn set_phase_offset(&mut self, offset: f64) {
        self.phase_ofs = offset.rem_euclid(1.0);
    }

    #[inline]
    pub fn reset_phase(&mut self) {
        self.phasor = 0.0;
    }

    /// Advance one sample and wrap into [0, 1).
    #[inline]
    pub fn update_phase(&mut self) {
        self.phasor += self.phase_inc;
        if self.phasor >= 1.0 {
            self.phasor -= 1.0;
            // Increments close to 1.0 can still leave us out of range.
            if self.phasor >= 1.0 {
                self.phasor = self.phasor.rem_euclid(1.0);
            }
        }
    }

    /// Interpolated sample at the current phase.
    #[inline]
    pub fn output(&self) -> f32 {
        self.read(self.phasor)
    }

    /// Sample at the current phase minus the sample at `phasor + phase_ofs`.
    pub fn output_minus_offset(&self) -> f32 {
        let mut offset_phasor = self.phasor + self.phase_ofs;
        if offset_phasor >= 1.0 {
            offset_phasor -= 1.0;
        }
        self.read(self.phasor) - self.read(offset_phasor)
    }

    #[inline]
    fn read(&self, phasor: f64) -> f32 {
        let Some(table) = self.tables.table_for(self.phase_inc) else {
            return 0.0;
        };
        let samples = table.samples();
        let len = samples.len();

        let pos = phasor * len as f64;
        let index = (pos as usize).min(len - 1);
        let frac = (pos - index as f64) as f32;
        let next = if index + 1 >= len { 0 } else { index + 1 };

        let s0 = samples[index];
        let s1 = samples[next];
        s0 + (s1 - s0) * frac
    }

    pub fn phasor(&self) -> f64 {
        self.phasor
    }

    pub fn phase_inc(&self) -> f64 {
        self.phase_inc
    }

    pub fn tables(&self) -> &Arc<WaveTableSet> {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableSizing;
    use approx::assert_abs_diff_eq;

    fn saw_osc() -> WavetableOsc {
        let set = WaveTableSet::build(
            Waveform::Sawtooth,
            20.0,
            44_100.0,
            TableSizing::ConstantSize,
            2,
        )
        .unwrap();
        WavetableOsc::new(Arc::new(set))
    }

    #[test]
    fn test_waveform_index_roundtrip() {
        for waveform in Waveform::ALL {
            assert_eq!(Waveform::from_index(waveform.index() as u8), waveform);
        }
        assert_eq!(Waveform::from_index(200), Waveform::Sine);
    }

    #[test]
    fn test_phasor_stays_in_unit_range() {
        let mut osc = saw_osc();
        for &inc in &[0.0, 1e-6, 0.0099, 0.25, 0.4999, 0.999_999] {
            osc.set_frequency(inc);
            for _ in 0..10_000 {
                osc.update_phase();
                let p = osc.phasor();
                assert!((0.0..1.0).contains(&p), "phasor {p} escaped [0,1) at inc {inc}");
            }
        }
    }

    #[test]
    fn test_phasor_tracks_increment() {
        let mut osc = saw_osc();
        let inc = 440.0 / 44_100.0;
        osc.set_frequency(inc);
        let n = 1_000;
        for _ in 0..n {
            osc.update_phase();
        }
        let expected = (n as f64 * inc).rem_euclid(1.0);
        assert_abs_diff_eq!(osc.phasor(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_output_interpolates_table() {
        let osc = saw_osc();
        let table = osc.tables().table_for(0.0).unwrap();
        // phasor 0 reads the first sample exactly
        assert_abs_diff_eq!(osc.output(), table.samples()[0], epsilon = 1e-7);
    }

    #[test]
    fn test_output_stays_normalized() {
        let mut osc = saw_osc();
        osc.set_frequency(0.01);
        for _ in 0..2_000 {
            let s = osc.output();
            assert!(s.abs() <= 1.1, "sample {s} far above full scale");
            osc.update_phase();
        }
    }

    #[test]
    fn test_high_pitch_selects_smaller_harmonic_table() {
        let mut osc = saw_osc();
        osc.set_frequency(0.0005);
        let low = osc.tables().table_for(osc.phase_inc()).unwrap().harmonics();
        osc.set_frequency(0.1);
        let high = osc.tables().table_for(osc.phase_inc()).unwrap().harmonics();
        assert!(high < low, "expected fewer harmonics at high pitch: {high} vs {low}");
    }

    #[test]
    fn test_pulse_output_with_zero_offset_is_silent() {
        let mut osc = saw_osc();
        osc.set_phase_offset(0.0);
        osc.set_frequency(0.003);
        for _ in 0..500 {
            assert_abs_diff_eq!(osc.output_minus_offset(), 0.0, epsilon = 1e-6);
            osc.update_phase();
        }
    }

    #[test]
    fn test_pulse_duty_cycle_follows_offset() {
        let mut osc = saw_osc();
        osc.set_phase_offset(0.25);
        osc.set_frequency(1.0 / 400.0);

        let mut positive = 0;
        for _ in 0..400 {
            if osc.output_minus_offset() > 0.0 {
                positive += 1;
            }
            osc.update_phase();
        }

        let duty = positive as f32 / 400.0;
        assert!(
            (0.2..0.3).contains(&duty),
            "expected ~25% duty cycle, got {duty}"
        );
    }
}
