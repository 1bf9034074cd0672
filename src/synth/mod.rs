// Purpose: voices, the voice pool and the note messages that drive them

pub mod message;
pub mod poly;
pub mod voice;

pub use message::{MessageReceiver, SynthMessage, TimedMessage};
pub use poly::VoicePool;
pub use voice::{Voice, VoiceState};
