//! Gain stage.

/*
Gain
====

  gain > 1.0  →  louder
  gain = 1.0  →  unchanged (unity)
  gain < 1.0  →  quieter
  gain = 0.0  →  silence

In decibels, dB = 20 × log₁₀(gain). Every halving is about -6 dB.

The gain knob sits first in the output chain, so the filter, tremolo and
delay all see the scaled signal. Note that the delay adds its echoes on top,
so with high feedback the output can still exceed the input level.
*/

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_gain() {
        let mut signal = [1.0, 0.5, -0.5, -1.0];
        apply_gain(&mut signal, 0.5);
        assert_eq!(signal, [0.5, 0.25, -0.25, -0.5]);
    }

    #[test]
    fn test_unity_gain_unchanged() {
        let mut signal = [0.3, -0.7, 0.5];
        apply_gain(&mut signal, 1.0);
        assert_eq!(signal, [0.3, -0.7, 0.5]);
    }

    #[test]
    fn test_zero_gain_silences() {
        let mut signal = [0.3, -0.7, 0.5];
        apply_gain(&mut signal, 0.0);
        assert_eq!(signal, [0.0, 0.0, 0.0]);
    }
}
