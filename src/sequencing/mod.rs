//! Chord progressions played over time.

pub mod player;

pub use player::{
    inter_chord_delay, run_sequence, CancellationToken, ChordTrigger, PlayerState,
    SequenceOutcome, SequencePlayer, SequenceState,
};
