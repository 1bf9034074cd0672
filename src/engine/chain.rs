//! Output processing applied to the mixed voices.

use crate::{
    config::SynthConfig,
    dsp::{
        amplify::apply_gain,
        delay::FeedbackDelay,
        filter::{cutoff_to_hz, resonance_to_q, LowPass},
        lfo::{lfo_rate_to_hz, Tremolo},
    },
    io::AudioBuffer,
    params::ParamSnapshot,
};

/*
Signal Chain
============

    voices ──▶ gain ──▶ low-pass ──▶ tremolo ──▶ feedback delay ──▶ out
                        (block)      (per sample, shared LFO phase)

Gain and the filter run over each channel's whole block. Tremolo and delay
run sample by sample. Every channel starts the block at the same LFO angle,
so the tremolo stays in phase across channels.

All state (filter memory, delay rings, LFO angle) is allocated in `new` and
only cleared by `reset`.
*/

pub struct SignalChain {
    filters: Vec<LowPass>,
    delays: Vec<FeedbackDelay>,
    tremolo: Tremolo,
    sample_rate: f32,
    cutoff_min_hz: f32,
    cutoff_max_hz: f32,
    q_min: f32,
    q_max: f32,
    lfo_min_hz: f32,
    lfo_max_hz: f32,
}

impl SignalChain {
    /// Allocate per-channel state for `config.max_channels` channels.
    pub fn new(config: &SynthConfig, sample_rate: f32, max_block_size: usize) -> Self {
        let channels = config.max_channels;
        Self {
            filters: (0..channels)
                .map(|_| LowPass::new(config.filter_design, max_block_size))
                .collect(),
            delays: (0..channels)
                .map(|_| FeedbackDelay::new(config.delay_capacity))
                .collect(),
            tremolo: Tremolo::new(),
            sample_rate,
            cutoff_min_hz: config.cutoff_min_hz,
            cutoff_max_hz: config.cutoff_max_hz,
            q_min: config.q_min,
            q_max: config.q_max,
            lfo_min_hz: config.lfo_min_hz,
            lfo_max_hz: config.lfo_max_hz,
        }
    }

    pub fn channels(&self) -> usize {
        self.filters.len()
    }

    /// Process the first `frames` frames of every channel the chain has
    /// state for. Channels past that are left untouched.
    pub fn process(&mut self, buffer: &mut AudioBuffer, frames: usize, params: &ParamSnapshot) {
        let frames = frames.min(buffer.num_frames());
        let cutoff_hz = cutoff_to_hz(
            params.cutoff,
            self.cutoff_min_hz,
            self.cutoff_max_hz,
            self.sample_rate,
        );
        let q = resonance_to_q(params.resonance, self.q_min, self.q_max);

        if params.lfo_enabled {
            let rate_hz = lfo_rate_to_hz(params.lfo_rate, self.lfo_min_hz, self.lfo_max_hz);
            self.tremolo.set_rate_hz(rate_hz, self.sample_rate);
        }

        let start_lfo = self.tremolo;
        let mut end_lfo = self.tremolo;

        for ((channel, filter), delay) in buffer
            .buffers
            .iter_mut()
            .zip(self.filters.iter_mut())
            .zip(self.delays.iter_mut())
        {
            let samples = &mut channel[..frames];

            apply_gain(samples, params.gain);

            filter.configure(self.sample_rate, cutoff_hz, q, frames);
            filter.render(samples);

            delay.set_feedback(params.delay_feedback);
            let mut lfo = start_lfo;
            for sample in samples.iter_mut() {
                let mut s = *sample;
                if params.lfo_enabled {
                    s *= lfo.next_gain();
                }
                *sample = delay.next_sample(s);
            }
            end_lfo = lfo;
        }

        if params.lfo_enabled {
            self.tremolo = end_lfo;
        }
    }

    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
        for delay in &mut self.delays {
            delay.reset();
        }
        self.tremolo.reset();
    }

    pub fn lfo_angle(&self) -> f32 {
        self.tremolo.angle()
    }
}
