use std::sync::Arc;

use log::debug;

use crate::{
    config::SynthConfig,
    dsp::{oscillator::Waveform, wavetable::WaveTableSet},
    io::AudioBuffer,
    synth::{
        message::SynthMessage,
        voice::{Voice, VoiceState},
    },
};

/// Fixed set of voices, `voices_per_waveform` for each waveform.
///
/// Only voices whose waveform is currently playable receive new notes. The
/// pool never grows: when every matching voice is busy, the oldest one is
/// cut and restarted.
pub struct VoicePool {
    voices: Vec<Voice>,
    playable: [bool; 4],
    note_counter: u64,
}

impl VoicePool {
    /// Build every voice up front. `tables[w.index()]` feeds the voices of
    /// waveform `w`; `None` means that waveform computes its samples directly.
    pub fn new(
        config: &SynthConfig,
        tables: &[Option<Arc<WaveTableSet>>; 4],
        sample_rate: f32,
    ) -> Self {
        let mut voices = Vec::with_capacity(config.voices_per_waveform * Waveform::ALL.len());
        for waveform in Waveform::ALL {
            for _ in 0..config.voices_per_waveform {
                voices.push(Voice::new(
                    waveform,
                    tables[waveform.index()].clone(),
                    config,
                    sample_rate,
                ));
            }
        }
        debug!("voice pool: {} voices", voices.len());

        let mut playable = [false; 4];
        playable[Waveform::default().index()] = true;

        Self {
            voices,
            playable,
            note_counter: 0,
        }
    }

    /// Make `waveform` the only one new notes are assigned to.
    /// Voices already sounding keep playing until released.
    pub fn set_playable(&mut self, waveform: Waveform) {
        self.playable = [false; 4];
        self.playable[waveform.index()] = true;
    }

    pub fn is_playable(&self, waveform: Waveform) -> bool {
        self.playable[waveform.index()]
    }

    pub fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note } => self.note_off(note, true),
            SynthMessage::AllNotesOff { allow_tail_off } => self.all_notes_off(allow_tail_off),
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) {
        // retriggering a held pitch fades the old voice out
        for voice in &mut self.voices {
            if voice.state() == VoiceState::Sounding && voice.note() == note {
                voice.stop_note(true);
            }
        }

        self.note_counter += 1;
        let age = self.note_counter;

        for waveform in Waveform::ALL {
            if !self.playable[waveform.index()] {
                continue;
            }
            let Some(index) = self.pick_voice(waveform) else {
                continue;
            };
            let voice = &mut self.voices[index];
            if !voice.is_idle() {
                voice.stop_note(false);
            }
            voice.start_note(note, velocity, waveform, age);
        }
    }

    /// First idle voice of `waveform`, else the oldest busy one.
    fn pick_voice(&self, waveform: Waveform) -> Option<usize> {
        let mut oldest: Option<(usize, u64)> = None;
        for (index, voice) in self.voices.iter().enumerate() {
            if voice.waveform() != waveform {
                continue;
            }
            if voice.is_idle() {
                return Some(index);
            }
            if oldest.map_or(true, |(_, age)| voice.age() < age) {
                oldest = Some((index, voice.age()));
            }
        }
        oldest.map(|(index, _)| index)
    }

    /// Release every voice playing `note`.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if !voice.is_idle() && voice.note() == note {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            voice.stop_note(allow_tail_off);
        }
    }

    /// Mix every active voice into `buffer[start..start + count]`.
    pub fn render(&mut self, buffer: &mut AudioBuffer, start: usize, count: usize) {
        for voice in &mut self.voices {
            voice.render(buffer, start, count);
        }
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_idle()).count()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Cut every voice without tail-off.
    pub fn reset(&mut self) {
        self.all_notes_off(false);
    }
}
