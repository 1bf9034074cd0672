use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF},
    synth::message::SynthMessage,
};

/// Translate a MIDI event on `channel_filter` into a synth message.
///
/// Velocity is scaled from 0-127 to 0.0-1.0. All Notes Off releases with
/// tail-off; All Sound Off cuts voices immediately.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    if midi.channel() != channel_filter {
        return None;
    }
    match midi {
        MidiEvent::NoteOn { key, velocity, .. } if key < 128 => Some(SynthMessage::NoteOn {
            note: key,
            velocity: velocity as f32 / 127.0,
        }),
        MidiEvent::NoteOff { key, .. } if key < 128 => Some(SynthMessage::NoteOff { note: key }),
        MidiEvent::ControlChange { controller, .. } if controller == CC_ALL_NOTES_OFF => {
            Some(SynthMessage::AllNotesOff {
                allow_tail_off: true,
            })
        }
        MidiEvent::ControlChange { controller, .. } if controller == CC_ALL_SOUND_OFF => {
            Some(SynthMessage::AllNotesOff {
                allow_tail_off: false,
            })
        }
        _ => None,
    }
}

pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
