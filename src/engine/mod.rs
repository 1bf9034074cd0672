//! The top-level synth: voice pool plus output chain behind one
//! `process_block` call.

pub mod chain;

use std::sync::Arc;

use log::info;

use crate::{
    config::{OscillatorMode, SynthConfig},
    dsp::{oscillator::Waveform, wavetable::WaveTableSet},
    error::{Error, Result},
    io::AudioBuffer,
    params::SynthParams,
    synth::{
        message::{MessageReceiver, SubOctave, SynthMessage, TimedMessage},
        poly::VoicePool,
    },
};

pub use self::chain::SignalChain;

/// Most live messages drained from the queue per block.
pub const MAX_BLOCK_EVENTS: usize = 1024;

/*
Block Processing
================

    process_block(buffer, events, sample_rate)
        │
        ├─ snapshot params (one atomic read each)
        ├─ apply each event, then its sub-octave companion
        └─ for each chunk of at most max_block_size frames:
               clear scratch
               render voices between event frames
               run the signal chain
               copy to the host buffer

Events are applied at their frame offset: voices render up to the event,
the event is applied, rendering continues. Frames past the end of the block
are applied at the end.

Everything the loop touches is allocated in `prepare`. The one exception is
a sample-rate change mid-stream: tables and delay lines depend on it, so
the engine re-prepares itself before rendering that block.
*/

struct Prepared {
    sample_rate: f32,
    max_block_size: usize,
    tables: [Option<Arc<WaveTableSet>>; 4],
    pool: VoicePool,
    chain: SignalChain,
    scratch: AudioBuffer,
    sub_octave: SubOctave,
}

pub struct SynthEngine {
    config: SynthConfig,
    params: Arc<SynthParams>,
    prepared: Option<Prepared>,
    live: Vec<TimedMessage>,
}

impl SynthEngine {
    /// Validate `config`. Nothing sample-rate dependent is built until
    /// [`prepare`](Self::prepare).
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            params: Arc::new(SynthParams::new()),
            prepared: None,
            live: Vec::with_capacity(MAX_BLOCK_EVENTS),
        })
    }

    /// Build tables, voices and chain state for `sample_rate`.
    ///
    /// `max_block_size` of 0 uses the configured default. Allocates.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<()> {
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        let max_block_size = if max_block_size == 0 {
            self.config.max_block_size
        } else {
            max_block_size
        };

        let mut tables: [Option<Arc<WaveTableSet>>; 4] = Default::default();
        if self.config.oscillator_mode == OscillatorMode::Wavetable {
            // sine is computed directly and needs no table
            for waveform in [Waveform::Square, Waveform::Triangle, Waveform::Sawtooth] {
                let set = WaveTableSet::build(
                    waveform,
                    self.config.table_base_freq,
                    sample_rate,
                    self.config.table_sizing,
                    self.config.table_oversampling,
                )?;
                tables[waveform.index()] = Some(Arc::new(set));
            }
        }

        let mut pool = VoicePool::new(&self.config, &tables, sample_rate);
        pool.set_playable(self.params.waveform());

        self.prepared = Some(Prepared {
            sample_rate,
            max_block_size,
            tables,
            pool,
            chain: SignalChain::new(&self.config, sample_rate, max_block_size),
            scratch: AudioBuffer::new(self.config.max_channels, max_block_size),
            sub_octave: SubOctave::new(self.config.sub_osc_interval),
        });

        info!(
            "prepared at {sample_rate} Hz, block {max_block_size}, {:?} oscillators, {:?} filter",
            self.config.oscillator_mode, self.config.filter_design
        );
        Ok(())
    }

    /// Clear delay lines, filter memory and LFO phase and cut every voice.
    pub fn reset(&mut self) {
        if let Some(prepared) = self.prepared.as_mut() {
            prepared.pool.reset();
            prepared.chain.reset();
            prepared.sub_octave.clear();
            info!("engine reset");
        }
    }

    /// Render one block into `buffer`, applying `events` at their frames.
    ///
    /// `buffer` is overwritten. An unprepared engine or an invalid sample
    /// rate yields silence; a new valid sample rate re-prepares first.
    pub fn process_block(
        &mut self,
        buffer: &mut AudioBuffer,
        events: &[TimedMessage],
        sample_rate: f32,
    ) {
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            buffer.clear();
            return;
        }

        let needs_prepare = match &self.prepared {
            Some(prepared) => prepared.sample_rate != sample_rate,
            None => false,
        };
        if needs_prepare {
            let block = self.prepared.as_ref().map_or(0, |p| p.max_block_size);
            if self.prepare(sample_rate, block).is_err() {
                self.prepared = None;
            }
        }

        let Some(prepared) = self.prepared.as_mut() else {
            buffer.clear();
            return;
        };

        let params = self.params.snapshot();
        let Prepared {
            max_block_size,
            pool,
            chain,
            scratch,
            sub_octave,
            ..
        } = prepared;

        pool.set_playable(params.waveform);
        let mut apply = |pool: &mut VoicePool, message: SynthMessage| {
            pool.handle_message(message);
            if let Some(companion) = sub_octave.companion(message, params.sub_osc_enabled) {
                pool.handle_message(companion);
            }
        };

        let frames = buffer.num_frames();
        let channels = buffer.num_channels().min(scratch.num_channels());
        let mut next_event = 0;
        let mut chunk_start = 0;

        while chunk_start < frames {
            let chunk_len = (*max_block_size).min(frames - chunk_start);
            let chunk_end = chunk_start + chunk_len;
            scratch.clear();

            let mut cursor = chunk_start;
            while next_event < events.len() {
                let event = events[next_event];
                let at = event.frame.max(cursor);
                if at >= chunk_end && chunk_end < frames {
                    break;
                }
                let at = at.min(chunk_end);
                pool.render(scratch, cursor - chunk_start, at - cursor);
                cursor = at;
                apply(&mut *pool, event.message);
                next_event += 1;
            }
            pool.render(scratch, cursor - chunk_start, chunk_end - cursor);

            chain.process(scratch, chunk_len, &params);

            for ch in 0..channels {
                buffer.buffers[ch][chunk_start..chunk_end]
                    .copy_from_slice(&scratch.buffers[ch][..chunk_len]);
            }
            chunk_start = chunk_end;
        }

        // events on an empty block still take effect
        for event in &events[next_event..] {
            apply(&mut *pool, event.message);
        }

        for channel in buffer.buffers.iter_mut().skip(channels) {
            channel.fill(0.0);
        }
    }

    /// Drain `rx` and render, applying every pending message at frame 0.
    pub fn render_live<R: MessageReceiver>(
        &mut self,
        rx: &mut R,
        buffer: &mut AudioBuffer,
        sample_rate: f32,
    ) {
        let mut live = std::mem::take(&mut self.live);
        live.clear();
        while live.len() < live.capacity() {
            match rx.pop() {
                Some(message) => live.push(TimedMessage::new(0, message)),
                None => break,
            }
        }
        self.process_block(buffer, &live, sample_rate);
        self.live = live;
    }

    /// Shared handle for changing parameters from any thread.
    pub fn params(&self) -> Arc<SynthParams> {
        Arc::clone(&self.params)
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.prepared.as_ref().map(|p| p.sample_rate)
    }

    pub fn active_voices(&self) -> usize {
        self.prepared.as_ref().map_or(0, |p| p.pool.active_count())
    }

    /// Table set used by `waveform`, if it has one.
    pub fn tables(&self, waveform: Waveform) -> Option<&Arc<WaveTableSet>> {
        self.prepared
            .as_ref()
            .and_then(|p| p.tables[waveform.index()].as_ref())
    }
}
