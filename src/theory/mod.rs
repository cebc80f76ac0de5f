//! Chord-chart music theory: spelling, chord qualities, roman numerals and
//! voice leading.
//!
//! Everything here is pure and allocation-light. Nothing in this module fails
//! loudly: unknown qualities sound as a major triad and note names that do not
//! parse are dropped from voicings.
//!
//! # Example
//!
//! ```
//! use strumkit::theory;
//!
//! assert_eq!(theory::spell_note(7 + 7, 7).to_string(), "D");
//! assert_eq!(theory::resolve_quality("m7"), vec![0, 3, 7, 10]);
//! assert_eq!(theory::roman_numeral(9, "m7"), "vim7");
//!
//! let voiced = theory::voice_lead(&["C", "E", "G"], "E");
//! assert_eq!(voiced[0], ("E".to_string(), 3));
//! ```

/// Chord symbols (root, quality, slash bass).
pub mod chord;
/// Pitch classes, note names and key-aware spelling.
pub mod pitch;
/// Quality tokens and their interval sets.
pub mod quality;
/// Functional labels relative to the key root.
pub mod roman;
/// Octave assignment from a bass note upward.
pub mod voicing;

pub use chord::{Chord, ChordParseError};
pub use pitch::{
    pitch_to_frequency, spell, spell_note, transpose_note, InvalidNoteName, Letter, NoteName,
    PitchClass,
};
pub use quality::{
    interval_label, interval_labels, resolve_quality, ChordQuality, Interval, IntervalSet,
};
pub use roman::{roman_numeral, roman_numeral_over};
pub use voicing::{voice_lead, voice_notes, VoicedPitch};
