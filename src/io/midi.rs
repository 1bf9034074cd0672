//! Raw MIDI 1.0 channel messages.

/// Controller number for "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;
/// Controller number for "All Sound Off".
pub const CC_ALL_SOUND_OFF: u8 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Parse one complete channel message.
    ///
    /// A note-on with velocity 0 is reported as a note-off. System messages,
    /// running status and truncated input return `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 || status >= 0xF0 {
            return None;
        }
        let channel = status & 0x0F;
        let data1 = |i: usize| data.get(i).copied().filter(|b| b & 0x80 == 0);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1(0)?,
                velocity: data1(1)?,
            }),
            0x90 => {
                let key = data1(0)?;
                let velocity = data1(1)?;
                if velocity == 0 {
                    Some(MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity: 0,
                    })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    })
                }
            }
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1(0)?,
                value: data1(1)?,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data1(0)?,
            }),
            0xE0 => {
                let lsb = data1(0)? as i16;
                let msb = data1(1)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}
