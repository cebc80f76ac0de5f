use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::voice::Voice;

/// Control messages from the trigger side to the audio-side mixer.
pub enum SynthMessage {
    /// Take ownership of a fully scheduled voice.
    Start(Box<Voice>),
    /// Close the gate on every sounding voice and drop pending ones.
    AllNotesOff,
}

impl std::fmt::Debug for SynthMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthMessage::Start(voice) => f
                .debug_struct("Start")
                .field("start_frame", &voice.start_frame())
                .field("frequency", &voice.frequency())
                .finish(),
            SynthMessage::AllNotesOff => f.write_str("AllNotesOff"),
        }
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

/// Same-thread queue, for offline rendering where the producer and the
/// mixer never run concurrently.
impl MessageReceiver for VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}
