//! Low Frequency Oscillator (LFO) used for tremolo.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running below the audible range. It does not make
sound on its own; it moves some other parameter up and down over time. Here
it moves the output volume, which is called tremolo.

Vocabulary
----------

  control-rate    Frequencies below hearing, ~0.01 Hz to ~20 Hz. Fast enough
                  to feel as motion, too slow to hear as pitch.

  rate            The knob position in [0, 1], mapped linearly onto
                  min_hz .. max_hz (0.1 Hz .. 20 Hz by default).

  omega           Angle advanced per sample: 2π · rate_hz / sample_rate.

  bipolar         Output swings -1.0 to +1.0 (a plain sine).

  unipolar        Output stays in 0.0 to 1.0. Volume can't go negative, so
                  tremolo uses the unipolar form:

                      gain = (sin(angle) + 1) / 2

    bipolar   unipolar
    -1.0      0.0        (silent trough)
     0.0      0.5
    +1.0      1.0        (full volume)


Typical Rates
-------------

    0.1 - 0.5 Hz    Slow swells
    0.5 - 2 Hz      Classic tremolo
    7 - 15 Hz       Fast "helicopter" tremolo
    ~20 Hz          Starts to turn into amplitude modulation sidebands


Free-running
------------

The tremolo is free-running: its phase ignores notes and keeps going
between blocks. All channels of a block read the same phase, so stereo
audio pulses together.
*/

use std::f32::consts::TAU;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Map a [0, 1] rate knob linearly onto `min_hz..=max_hz`.
#[inline]
pub fn lfo_rate_to_hz(rate: f32, min_hz: f32, max_hz: f32) -> f32 {
    min_hz + rate.clamp(0.0, 1.0) * (max_hz - min_hz)
}

/// Sine LFO producing a unipolar gain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tremolo {
    angle: f32,
    omega: f32,
}

impl Tremolo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rate. Ignored until the sample rate is known.
    pub fn set_rate_hz(&mut self, rate_hz: f32, sample_rate: f32) {
        if sample_rate > 0.0 {
            self.omega = TAU * rate_hz / sample_rate;
        }
    }

    /// Gain at the current angle without advancing.
    #[inline]
    pub fn gain(&self) -> f32 {
        bipolar_to_unipolar(self.angle.sin())
    }

    /// Advance one sample, wrapping the angle into [0, 2π).
    #[inline]
    pub fn advance(&mut self) {
        self.angle += self.omega;
        if self.angle >= TAU {
            self.angle -= TAU;
        }
    }

    /// Gain at the current angle, then advance.
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        let gain = self.gain();
        self.advance();
        gain
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn omega(&self) -> f32 {
        self.omega
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
    }
}
