//! Low-pass filters for the output chain.

use crate::config::FilterDesign;

/*
Two Low-Pass Designs
====================

| design         | slope        | resonance | cost per sample   |
| -------------- | ------------ | --------- | ----------------- |
| Biquad (RBJ)   | 12 dB/octave | yes (Q)   | 5 mul, 4 add      |
| MovingAverage  | sinc-shaped  | no        | 1 add, 1 sub, 1 div |

Vocabulary
----------

  cutoff      The knob position in [0, 1]. It is mapped exponentially to Hz
              so equal knob travel sounds like equal pitch travel:

                  hz = min_hz * (max_hz / min_hz) ^ cutoff

              With the defaults (600 Hz .. 20 kHz) the middle of the knob
              is ~3.5 kHz.

  resonance   Knob in [0, 1] mapped the same way onto Q, 0.707 .. 12.
              Q = 0.707 is the flattest response with no bump.

  look-back   Window length of the moving average. A boxcar of N samples
              has its -3 dB point near 0.443 * sample_rate / N, so we solve
              that for N.


Direct Form I
-------------

    y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]

Coefficients come from the Audio EQ Cookbook and are normalized by a0.
They are only recomputed when the cutoff, Q or sample rate actually moved.


Running Sum
-----------

The moving average keeps a ring of past inputs and a running sum:

    sum += x[n] - x[n - len]
    y[n] = sum / len

The window length only changes between blocks. When it does, the sum is
rebuilt from the ring so the output does not jump.
*/

/// Map a [0, 1] cutoff knob to Hz, clamped below Nyquist.
#[inline]
pub fn cutoff_to_hz(cutoff: f32, min_hz: f32, max_hz: f32, sample_rate: f32) -> f32 {
    let c = cutoff.clamp(0.0, 1.0);
    let hz = min_hz * (max_hz / min_hz).powf(c);
    if sample_rate > 0.0 {
        hz.min(sample_rate * 0.499)
    } else {
        hz
    }
}

/// Map a [0, 1] resonance knob to Q.
#[inline]
pub fn resonance_to_q(resonance: f32, q_min: f32, q_max: f32) -> f32 {
    let r = resonance.clamp(0.0, 1.0);
    q_min * (q_max / q_min).powf(r)
}

/// Moving-average window length for `cutoff_hz`, limited to the block and ring size.
#[inline]
pub fn moving_average_lookback(
    sample_rate: f32,
    cutoff_hz: f32,
    block_len: usize,
    capacity: usize,
) -> usize {
    let upper = block_len.min(capacity).max(1);
    if !(sample_rate > 0.0 && cutoff_hz > 0.0) {
        return 1;
    }
    let samples = (0.443 * sample_rate / cutoff_hz).round() as usize;
    samples.clamp(1, upper)
}

/// RBJ cookbook low-pass biquad.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    sample_rate: f32,
    cutoff_hz: f32,
    q: f32,
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Biquad {
    /// Unconfigured filter; passes audio through until [`set_params`](Self::set_params).
    pub fn new() -> Self {
        Self {
            sample_rate: 0.0,
            cutoff_hz: 0.0,
            q: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Reconfigure if anything changed. A sample rate of zero is ignored.
    pub fn set_params(&mut self, sample_rate: f32, cutoff_hz: f32, q: f32) {
        if sample_rate <= 0.0 {
            return;
        }
        if sample_rate == self.sample_rate && cutoff_hz == self.cutoff_hz && q == self.q {
            return;
        }
        self.sample_rate = sample_rate;
        self.cutoff_hz = cutoff_hz.clamp(1.0, sample_rate * 0.499);
        self.q = q.max(0.01);
        self.update_coefficients();
    }

    fn update_coefficients(&mut self) {
        let omega = std::f32::consts::TAU * self.cutoff_hz / self.sample_rate;
        let (sn, cs) = omega.sin_cos();
        let alpha = sn / (2.0 * self.q);

        let a0 = 1.0 + alpha;
        self.b0 = (1.0 - cs) / 2.0 / a0;
        self.b1 = (1.0 - cs) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cs / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }
}

/// Boxcar low-pass over a preallocated ring.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    ring: Vec<f32>,
    pos: usize,
    len: usize,
    sum: f64,
}

impl MovingAverage {
    /// Allocates the ring. `capacity` is the longest window ever used.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: vec![0.0; capacity.max(1)],
            pos: 0,
            len: 1,
            sum: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    pub fn lookback(&self) -> usize {
        self.len
    }

    /// Change the window length. Call between blocks only.
    pub fn set_lookback(&mut self, len: usize) {
        let len = len.clamp(1, self.ring.len());
        if len == self.len {
            return;
        }
        self.len = len;

        let cap = self.ring.len();
        self.sum = (1..=len)
            .map(|back| self.ring[(self.pos + cap - back) % cap] as f64)
            .sum();
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let cap = self.ring.len();
        let leaving = self.ring[(self.pos + cap - self.len) % cap];
        self.sum += input as f64 - leaving as f64;
        self.ring[self.pos] = input;
        self.pos = (self.pos + 1) % cap;
        (self.sum / self.len as f64) as f32
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ring.fill(0.0);
        self.pos = 0;
        self.sum = 0.0;
    }
}

/// One channel's low-pass, whichever design the engine was built with.
#[derive(Debug, Clone)]
pub enum LowPass {
    Biquad(Biquad),
    MovingAverage(MovingAverage),
}

impl LowPass {
    /// Allocates the moving-average ring when that design is chosen.
    pub fn new(design: FilterDesign, max_block_size: usize) -> Self {
        match design {
            FilterDesign::Biquad => LowPass::Biquad(Biquad::new()),
            FilterDesign::MovingAverage => LowPass::MovingAverage(MovingAverage::new(max_block_size)),
        }
    }

    /// Apply block-rate settings. Must be called before [`render`](Self::render) each block.
    pub fn configure(&mut self, sample_rate: f32, cutoff_hz: f32, q: f32, block_len: usize) {
        match self {
            LowPass::Biquad(filter) => filter.set_params(sample_rate, cutoff_hz, q),
            LowPass::MovingAverage(filter) => {
                let len =
                    moving_average_lookback(sample_rate, cutoff_hz, block_len, filter.capacity());
                filter.set_lookback(len);
            }
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        match self {
            LowPass::Biquad(filter) => filter.render(buffer),
            LowPass::MovingAverage(filter) => filter.render(buffer),
        }
    }

    pub fn reset(&mut self) {
        match self {
            LowPass::Biquad(filter) => filter.reset(),
            LowPass::MovingAverage(filter) => filter.reset(),
        }
    }
}
