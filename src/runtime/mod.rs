//! Playback front end tying the engine, the sequence player and an output
//! together.
//!
//! `Strumkit::live` plays through the sound card, `Strumkit::offline` renders
//! into memory. Both expose the same chord and sequence controls.

mod app;

pub use app::Strumkit;
