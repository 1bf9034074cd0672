//! In-place radix-2 FFT used by the wavetable builder.

/*
Radix-2 Cooley-Tukey
====================

The table builder describes each waveform by its harmonic spectrum and needs
one inverse transform per octave to turn that spectrum into a single cycle
of samples. Table lengths are always powers of two, so the classic iterative
radix-2 algorithm is all we need:

  1. Reorder the input by bit-reversed index. After this shuffle, every pair
     of neighbours holds the inputs of a length-2 DFT.

        index  binary  reversed
          1     001      100  -> 4
          3     011      110  -> 6

  2. Run log2(N) butterfly stages. Stage s merges DFTs of length L/2 into
     DFTs of length L = 2^s:

        X[k]       = E[k] + W^k * O[k]
        X[k + L/2] = E[k] - W^k * O[k]       W = e^(sign * 2πi / L)

The forward transform uses sign = -1, the inverse sign = +1. The inverse is
left unnormalized (no 1/N factor): the table builder rescales every table to
a fixed peak anyway.
*/

use std::f64::consts::TAU;

use rustfft::num_complex::Complex;

use crate::error::{Error, Result};

/// Reorder `data` so element `i` moves to the bit-reversed position of `i`.
pub fn bit_reverse_permute<T>(data: &mut [T]) {
    let n = data.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

fn transform(data: &mut [Complex<f64>], sign: f64) -> Result<()> {
    let n = data.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(n));
    }

    bit_reverse_permute(data);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = sign * TAU / len as f64;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let w = Complex::from_polar(1.0, step * k as f64);
                let even = data[start + k];
                let odd = data[start + k + half] * w;
                data[start + k] = even + odd;
                data[start + k + half] = even - odd;
            }
        }
        len <<= 1;
    }

    Ok(())
}

/// Forward transform: `X[k] = Σ x[n] e^(-2πikn/N)`.
pub fn fft_in_place(data: &mut [Complex<f64>]) -> Result<()> {
    transform(data, -1.0)
}

/// Unnormalized inverse transform: `x[n] = Σ X[k] e^(2πikn/N)`.
pub fn ifft_in_place(data: &mut [Complex<f64>]) -> Result<()> {
    transform(data, 1.0)
}
