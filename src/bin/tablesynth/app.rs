//! Audio device setup and the control-thread score player.

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use rtrb::RingBuffer;

use tablesynth::{
    analysis::{highest_active_bin, magnitude_spectrum},
    AudioBuffer, Patch, SynthConfig, SynthEngine, SynthMessage, Waveform, MAX_BLOCK_SIZE,
};

/// One instruction for the control thread.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Note { note: u8, velocity: f32, millis: u64 },
    Rest(u64),
    Waveform(Waveform),
    /// Enable tremolo at the given rate knob.
    Tremolo(f32),
    SubOsc(bool),
}

pub struct Player {
    patch: Patch,
    config: SynthConfig,
}

impl Player {
    pub fn new(patch: Patch) -> Self {
        Self {
            patch,
            config: SynthConfig::default(),
        }
    }

    pub fn run(self, score: &[Step]) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;

        let mut engine = SynthEngine::new(self.config).wrap_err("invalid synth config")?;
        engine
            .prepare(sample_rate, MAX_BLOCK_SIZE)
            .wrap_err("failed to prepare synth")?;
        self.patch.apply_to(&engine.params());
        report_tables(&engine, sample_rate);

        info!("patch '{}': {} Hz, {} channels", self.patch.name, sample_rate, channels);

        let params = engine.params();
        let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(256);

        let mut block = AudioBuffer::new(engine.config().max_channels, MAX_BLOCK_SIZE);

        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    // within capacity: no allocation
                    for channel in &mut block.buffers {
                        channel.resize(frames, 0.0);
                    }

                    engine.render_live(&mut rx, &mut block, sample_rate);

                    let start = frames_written * channels;
                    let end = start + frames * channels;
                    block.write_interleaved(&mut data[start..end], channels, frames);

                    frames_written += frames;
                }
            },
            |err| eprintln!("Audio error: {}", err),
            None,
        )?;

        stream.play()?;

        let mut send = |message: SynthMessage| {
            if tx.push(message).is_err() {
                warn!("message queue full, dropped {message:?}");
            }
        };

        for step in score {
            match *step {
                Step::Note {
                    note,
                    velocity,
                    millis,
                } => {
                    send(SynthMessage::NoteOn { note, velocity });
                    thread::sleep(Duration::from_millis(millis));
                    send(SynthMessage::NoteOff { note });
                }
                Step::Rest(millis) => thread::sleep(Duration::from_millis(millis)),
                Step::Waveform(waveform) => {
                    info!("waveform: {waveform:?}");
                    params.set_waveform(waveform);
                }
                Step::Tremolo(rate) => {
                    params.set_lfo_rate(rate);
                    params.set_lfo_enabled(true);
                }
                Step::SubOsc(enabled) => params.set_sub_osc_enabled(enabled),
            }
        }

        send(SynthMessage::AllNotesOff {
            allow_tail_off: true,
        });
        thread::sleep(Duration::from_millis(200));

        let final_patch = Patch::capture(self.patch.name.clone(), &params);
        if let Ok(json) = final_patch.to_json() {
            info!("final patch:\n{json}");
        }
        Ok(())
    }
}

/// Log how many harmonics survive in the lowest and highest table of each set.
fn report_tables(engine: &SynthEngine, sample_rate: f32) {
    for waveform in Waveform::ALL {
        let Some(set) = engine.tables(waveform) else {
            continue;
        };
        let (Some(first), Some(last)) = (set.tables().first(), set.tables().last()) else {
            continue;
        };
        let low = highest_active_bin(&magnitude_spectrum(first.samples()), 1e-4);
        let high = highest_active_bin(&magnitude_spectrum(last.samples()), 1e-4);
        info!(
            "{waveform:?}: {} tables, top bin {:?} .. {:?}, safe up to {:.0} Hz",
            set.len(),
            low,
            high,
            last.top_freq() * sample_rate as f64
        );
    }
}
