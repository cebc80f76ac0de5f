//! Chord spelling, voice leading and a strummed electric-piano synth.
//!
//! The crate has two halves. `theory` is pure: it spells notes in a key,
//! resolves chord qualities, names roman numerals and voices chords. The
//! playback half (`synth`, `sequencing`, `runtime`) turns voiced chords into
//! strummed, enveloped voices mixed on an audio thread or rendered offline.

pub mod config;
pub mod dsp;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod runtime;
pub mod sequencing; // Chord progressions over time
#[cfg(feature = "suggest")]
pub mod suggest;
pub mod synth; // Voice scheduling and mixing
pub mod theory;
pub mod voices;

pub use config::EngineConfig;
pub use runtime::Strumkit;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
