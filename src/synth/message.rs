#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Note-level control messages for the voice pool.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    /// `velocity` is 0.0-1.0.
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    AllNotesOff { allow_tail_off: bool },
}

impl SynthMessage {
    /// Same message moved by `semitones`, or `None` if it leaves 0..=127.
    /// Messages without a note are not transposable.
    pub fn transposed(&self, semitones: i8) -> Option<SynthMessage> {
        match *self {
            SynthMessage::NoteOn { note, velocity } => {
                transpose(note, semitones).map(|note| SynthMessage::NoteOn { note, velocity })
            }
            SynthMessage::NoteOff { note } => {
                transpose(note, semitones).map(|note| SynthMessage::NoteOff { note })
            }
            SynthMessage::AllNotesOff { .. } => None,
        }
    }
}

/// A message scheduled at a frame offset inside the current block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimedMessage {
    pub frame: usize,
    pub message: SynthMessage,
}

impl TimedMessage {
    pub fn new(frame: usize, message: SynthMessage) -> Self {
        Self { frame, message }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

#[inline]
pub fn transpose(note: u8, semitones: i8) -> Option<u8> {
    let shifted = note as i16 + semitones as i16;
    (0..=127).contains(&shifted).then_some(shifted as u8)
}

/// Sub-oscillator note doubling.
///
/// Remembers which held notes were doubled, so a note released after the
/// sub-oscillator was switched off still releases its transposed copy.
#[derive(Debug, Clone)]
pub struct SubOctave {
    semitones: i8,
    doubled: [bool; 128],
}

impl SubOctave {
    pub fn new(semitones: i8) -> Self {
        Self {
            semitones,
            doubled: [false; 128],
        }
    }

    /// The transposed companion of `message`, if it needs one.
    ///
    /// Note-ons are doubled only while `enabled`. A note-off is doubled
    /// whenever its note-on was, whatever `enabled` says now.
    pub fn companion(&mut self, message: SynthMessage, enabled: bool) -> Option<SynthMessage> {
        match message {
            SynthMessage::NoteOn { note, .. } => {
                if !enabled {
                    return None;
                }
                let companion = message.transposed(self.semitones)?;
                self.doubled[note as usize & 0x7f] = true;
                Some(companion)
            }
            SynthMessage::NoteOff { note } => {
                let was_doubled = std::mem::take(&mut self.doubled[note as usize & 0x7f]);
                if was_doubled || enabled {
                    message.transposed(self.semitones)
                } else {
                    None
                }
            }
            SynthMessage::AllNotesOff { .. } => {
                self.clear();
                None
            }
        }
    }

    pub fn is_doubled(&self, note: u8) -> bool {
        self.doubled[note as usize & 0x7f]
    }

    pub fn clear(&mut self) {
        self.doubled = [false; 128];
    }
}
