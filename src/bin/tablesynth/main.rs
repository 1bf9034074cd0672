//! tablesynth - play the wavetable synth on the default output device
//!
//! Run with: cargo run -- [patch.json]
//!
//! Plays a short arpeggio through each waveform, switching the filter,
//! tremolo and sub-oscillator along the way.

mod app;

use std::{env, fs};

use color_eyre::eyre::WrapErr;
use tablesynth::{Patch, Waveform};

use app::{Player, Step};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    colog::init();

    let patch = match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read patch file {path}"))?;
            Patch::from_json(&json).wrap_err_with(|| format!("failed to parse patch {path}"))?
        }
        None => Patch {
            delay_feedback: 0.35,
            cutoff: 0.7,
            ..Patch::default()
        },
    };

    let arpeggio = [60, 63, 67, 72, 67, 63];
    let mut score = Vec::new();
    for waveform in Waveform::ALL {
        score.push(Step::Waveform(waveform));
        for &note in &arpeggio {
            score.push(Step::Note {
                note,
                velocity: 0.9,
                millis: 180,
            });
        }
    }
    score.push(Step::Tremolo(0.3));
    score.push(Step::SubOsc(true));
    for &note in &arpeggio {
        score.push(Step::Note {
            note: note - 12,
            velocity: 1.0,
            millis: 300,
        });
    }
    score.push(Step::Rest(1_500));

    Player::new(patch).run(&score)
}
