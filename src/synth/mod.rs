// Purpose: strum scheduling, voice lifetime, polyphonic mixing
// This layer sits above graph nodes: the engine decides when each string
// sounds, the mixer renders whatever is sounding.

pub mod engine;
pub mod factory;
pub mod message;
pub mod offline;
pub mod poly;
pub mod voice;

pub use engine::{ClockReading, SynthesisEngine, VoiceSink, VoicedNote};
pub use offline::OfflineRenderer;
pub use poly::{FrameClock, StrumMixer};
pub use voice::{Voice, VoiceState};
