//! Band-limited wavetable construction.
//!
//! A [`WaveTableSet`] holds one single-cycle table per octave for a waveform.
//! Each table only contains the harmonics that stay clear of aliasing up to
//! its `top_freq`, so the oscillator can switch tables as the pitch rises.
//!
//! Building a set runs an inverse FFT per octave and allocates; do it at
//! prepare time, never from the audio callback.

/*
How the Octaves Are Laid Out
----------------------------

With a base frequency of 20 Hz at 44.1 kHz:

    max_harms = round(44100 / (3 * 20))       = 735
    table_len = next_pow2(735) * 2 * 2        = 4096

    octave  harmonics  top_freq (cycles/sample)
      0        735       40 / 44100
      1        367       80 / 44100
      2        183      160 / 44100
      ...
      9          1    20480 / 44100

The "3" in max_harms is the trick: at the top of a table's range, its
highest harmonic sits at 2/3 of the sample rate. It does alias, but the
alias lands above 1/3 of the sample rate, above every harmonic the next
octave up will ever play, so what you hear stays clean.

Every table is scaled by the factor that brings the *first* table to a peak
of 0.999. Reusing that one factor keeps the loudness consistent when the
oscillator hops between tables.
*/

use log::{debug, warn};
use rustfft::num_complex::Complex;

use crate::{
    config::TableSizing,
    dsp::{fft::ifft_in_place, oscillator::Waveform},
    error::{Error, Result},
};

/// Maximum number of tables a set can hold.
pub const WAVE_TABLE_SLOTS: usize = 32;

/// Peak level of the first (most harmonic-rich) table after normalization.
const NORMALIZED_PEAK: f64 = 0.999;

/// One immutable single-cycle table.
#[derive(Debug, Clone)]
pub struct WaveTable {
    samples: Vec<f32>,
    top_freq: f64,
    harmonics: usize,
}

impl WaveTable {
    pub fn new(samples: Vec<f32>, top_freq: f64, harmonics: usize) -> Self {
        Self {
            samples,
            top_freq,
            harmonics,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Highest phase increment (cycles/sample) this table is safe at.
    pub fn top_freq(&self) -> f64 {
        self.top_freq
    }

    pub fn harmonics(&self) -> usize {
        self.harmonics
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }
}

/// Tables for one waveform, ascending in `top_freq`.
#[derive(Debug, Clone)]
pub struct WaveTableSet {
    waveform: Waveform,
    tables: Vec<WaveTable>,
    scale: f64,
}

impl WaveTableSet {
    /// Empty set; fill it with [`push`](Self::push) or use [`build`](Self::build).
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            tables: Vec::with_capacity(WAVE_TABLE_SLOTS),
            scale: 0.0,
        }
    }

    /// Append a table. Fails when the set is full or the table does not
    /// extend the frequency range upward.
    pub fn push(&mut self, table: WaveTable) -> Result<()> {
        if self.tables.len() >= WAVE_TABLE_SLOTS {
            return Err(Error::TableCapacityExceeded {
                capacity: WAVE_TABLE_SLOTS,
            });
        }
        if table.is_empty() {
            return Err(Error::InvalidConfig("wavetable must not be empty".into()));
        }
        if let Some(last) = self.tables.last() {
            if table.top_freq <= last.top_freq {
                return Err(Error::InvalidConfig(format!(
                    "wavetable top_freq must ascend: {} after {}",
                    table.top_freq, last.top_freq
                )));
            }
        }
        self.tables.push(table);
        Ok(())
    }

    /// Build the full octave ladder for `waveform`.
    ///
    /// Sine needs a single table. For the other waveforms the harmonic count
    /// halves every octave until it reaches one. If the ladder would need
    /// more than [`WAVE_TABLE_SLOTS`] tables, the extra ones are dropped.
    pub fn build(
        waveform: Waveform,
        base_freq: f32,
        sample_rate: f32,
        sizing: TableSizing,
        oversampling: usize,
    ) -> Result<Self> {
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if !(base_freq > 0.0 && base_freq.is_finite()) {
            return Err(Error::InvalidBaseFrequency {
                base_freq,
                sample_rate,
            });
        }
        if oversampling == 0 || !oversampling.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "table oversampling must be a power of two, got {oversampling}"
            )));
        }

        let sr = sample_rate as f64;
        let mut max_harms = (sr / (3.0 * base_freq as f64) + 0.5) as usize;
        if max_harms < 1 {
            return Err(Error::InvalidBaseFrequency {
                base_freq,
                sample_rate,
            });
        }
        if waveform == Waveform::Sine {
            max_harms = 1;
        }

        let mut len = max_harms.next_power_of_two() * 2 * oversampling;
        let mut top_freq = base_freq as f64 * 2.0 / sr;
        let mut set = WaveTableSet::new(waveform);
        let mut spectrum = vec![Complex::new(0.0, 0.0); len];

        let mut harmonics = max_harms;
        while harmonics >= 1 {
            // Sine is a single partial: one table covers everything below Nyquist.
            if waveform == Waveform::Sine {
                top_freq = 0.5;
            }

            spectrum.truncate(len);
            let stored = fill_spectrum(waveform, harmonics, &mut spectrum);
            ifft_in_place(&mut spectrum)?;

            if set.scale == 0.0 {
                let peak = spectrum.iter().fold(0.0f64, |acc, c| acc.max(c.re.abs()));
                if peak <= f64::EPSILON {
                    return Err(Error::InvalidConfig(format!(
                        "{waveform:?} produced a silent table"
                    )));
                }
                set.scale = NORMALIZED_PEAK / peak;
            }

            let samples: Vec<f32> = spectrum.iter().map(|c| (c.re * set.scale) as f32).collect();

            match set.push(WaveTable::new(samples, top_freq, stored)) {
                Ok(()) => {}
                Err(Error::TableCapacityExceeded { capacity }) => {
                    warn!(
                        "{waveform:?} wavetable set full at {capacity} tables; \
                         base frequency {base_freq} Hz is too low for {sample_rate} Hz"
                    );
                    break;
                }
                Err(e) => return Err(e),
            }

            harmonics /= 2;
            top_freq *= 2.0;
            if let TableSizing::ConstantOversampling { min_len } = sizing {
                if len > min_len.max(4) {
                    len /= 2;
                }
            }
        }

        debug!(
            "built {} {:?} tables (base {} Hz, {} Hz, first len {})",
            set.tables.len(),
            waveform,
            base_freq,
            sample_rate,
            set.tables.first().map_or(0, WaveTable::len)
        );

        Ok(set)
    }

    /// First table whose `top_freq` covers `phase_inc`, else the highest one.
    #[inline]
    pub fn table_for(&self, phase_inc: f64) -> Option<&WaveTable> {
        self.tables
            .iter()
            .find(|t| t.top_freq >= phase_inc)
            .or_else(|| self.tables.last())
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn tables(&self) -> &[WaveTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Normalization factor shared by every table (0.0 until the first table is built).
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Write conjugate-symmetric sine-series bins for `harmonics` partials.
///
/// `X[k] = -i·a/2` and `X[N-k] = +i·a/2` so the inverse transform yields
/// `Σ a_k sin(2πkn/N)`. DC and Nyquist stay empty. Returns the number of
/// harmonics that fit.
fn fill_spectrum(waveform: Waveform, harmonics: usize, spectrum: &mut [Complex<f64>]) -> usize {
    let len = spectrum.len();
    spectrum.fill(Complex::new(0.0, 0.0));

    let stored = harmonics.min(len / 2 - 1);
    for k in 1..=stored {
        let half = 0.5 * waveform.harmonic_amplitude(k);
        spectrum[k] = Complex::new(0.0, -half);
        spectrum[len - k] = Complex::new(0.0, half);
    }
    stored
}
