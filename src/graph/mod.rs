//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs:
//! note events, a per-block render call and a way to tell when the sound has
//! finished. The `extensions` module adds fluent helpers so patches read as a
//! chain.

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Envelope generator node exposing ADSR state.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, `.layer()`).
pub mod extensions;
/// Lowpass filter node with an optional cutoff envelope.
pub mod filter;
/// Weighted sum of two parallel sources.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;
