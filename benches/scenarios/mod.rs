//! Real-world scenario benchmarks.
//!
//! These benchmarks model actual usage: the keys voice on its own, and whole
//! strummed chords mixed by the offline renderer.

mod strum;
mod voices;

pub use strum::bench_strum;
pub use voices::bench_voices;
