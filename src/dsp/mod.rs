//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math so graph combinators can layer on note handling.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Two-pole lowpass state-variable filter.
pub mod filter;
/// Sine and triangle oscillators.
pub mod oscillator;
/// Linear and exponential parameter ramps.
pub mod ramp;
/// One-shot filter cutoff envelope.
pub mod sweep;

pub use envelope::EnvelopeState;
