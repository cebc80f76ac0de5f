use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::theory::{
    pitch::NoteName,
    quality::{ChordQuality, IntervalSet},
};

/*
Chord Symbols
=============

A chord symbol is root + quality + optional "/bass":

    C        root C, quality "",     no bass
    Ebm7b5   root Eb, quality "m7b5", no bass
    C/E      root C, quality "",     bass E   (first inversion)
    D7/C     root D, quality "7",    bass C   (third inversion)
    C/D      root C, quality "",     bass D   (bass is not a chord tone)

The quality is kept as written; resolving it to intervals happens on demand
and never fails (unknown qualities sound as a major triad).

Sounding Order
--------------

`notes()` lists the chord the way it should be stacked from the bottom:

  - no bass:             root first, then chord tones in interval order
  - bass is a chord tone: rotate so the bass leads (C/E -> E G C)
  - bass is foreign:      prepend it           (C/D -> D C E G)
*/

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordParseError {
    #[error("empty chord symbol")]
    Empty,
    #[error("chord symbol {0:?} does not start with a note name")]
    InvalidRoot(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: NoteName,
    quality: String,
    bass: Option<NoteName>,
}

impl Chord {
    pub fn new(root: NoteName, quality: impl Into<String>, bass: Option<NoteName>) -> Self {
        Self {
            root,
            quality: quality.into(),
            bass,
        }
    }

    /// Parse a chord symbol such as `"F#m7"`, `"Bbmaj7/D"` or `"G13"`.
    ///
    /// A trailing `/X` is treated as a bass only when `X` is a note name, so
    /// qualities containing a slash are kept intact.
    pub fn parse(symbol: &str) -> Result<Self, ChordParseError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let (body, bass) = match symbol.rsplit_once('/') {
            Some((body, bass_text)) => match bass_text.parse::<NoteName>() {
                Ok(bass) => (body, Some(bass)),
                Err(_) => (symbol, None),
            },
            None => (symbol, None),
        };

        let (root, quality) = NoteName::parse_prefix(body)
            .ok_or_else(|| ChordParseError::InvalidRoot(symbol.to_string()))?;

        Ok(Self::new(root, quality, bass))
    }

    pub fn root(&self) -> NoteName {
        self.root
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn bass(&self) -> Option<NoteName> {
        self.bass
    }

    /// The note that sounds lowest: the named bass, or the root.
    pub fn bass_note(&self) -> NoteName {
        self.bass.unwrap_or(self.root)
    }

    pub fn chord_quality(&self) -> ChordQuality {
        ChordQuality::resolve(&self.quality)
    }

    pub fn intervals(&self) -> IntervalSet {
        self.chord_quality().intervals()
    }

    /// Chord tones spelled from the root, in interval order.
    pub fn tones(&self) -> Vec<NoteName> {
        self.intervals()
            .intervals()
            .iter()
            .map(|interval| {
                self.root
                    .spell_above(interval.semitones() as i32, interval.degree())
            })
            .collect()
    }

    /// Chord tones in sounding order, bass first.
    pub fn notes(&self) -> Vec<NoteName> {
        let mut tones = self.tones();
        let Some(bass) = self.bass else {
            return tones;
        };

        match tones
            .iter()
            .position(|tone| tone.pitch_class() == bass.pitch_class())
        {
            Some(index) => tones.rotate_left(index),
            None => tones.insert(0, bass),
        }
        tones
    }
}

impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chord::parse(s)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(notes: &[NoteName]) -> Vec<String> {
        notes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn parses_root_quality_and_bass() {
        let chord = Chord::parse("Bbmaj7/D").unwrap();
        assert_eq!(chord.root().to_string(), "Bb");
        assert_eq!(chord.quality(), "maj7");
        assert_eq!(chord.bass().map(|b| b.to_string()), Some("D".to_string()));
        assert_eq!(chord.to_string(), "Bbmaj7/D");
    }

    #[test]
    fn rejects_missing_root() {
        assert_eq!(Chord::parse("   "), Err(ChordParseError::Empty));
        assert!(matches!(Chord::parse("m7"), Err(ChordParseError::InvalidRoot(_))));
    }

    #[test]
    fn slash_that_is_not_a_note_stays_in_quality() {
        let chord = Chord::parse("C6/9").unwrap();
        assert_eq!(chord.quality(), "6/9");
        assert_eq!(chord.bass(), None);
        assert_eq!(names(&chord.tones()), ["C", "E", "G", "A", "D"]);
    }

    #[test]
    fn spells_chord_tones_from_degrees() {
        assert_eq!(names(&Chord::parse("Cmaj7").unwrap().tones()), ["C", "E", "G", "B"]);
        assert_eq!(names(&Chord::parse("Ebm7b5").unwrap().tones()), ["Eb", "Gb", "Bbb", "Db"]);
        assert_eq!(names(&Chord::parse("F#7").unwrap().tones()), ["F#", "A#", "C#", "E"]);
    }

    #[test]
    fn unknown_quality_sounds_major() {
        let chord = Chord::parse("Dxyz").unwrap();
        assert_eq!(chord.quality(), "xyz");
        assert_eq!(names(&chord.tones()), ["D", "F#", "A"]);
    }

    #[test]
    fn inversion_rotates_bass_to_front() {
        assert_eq!(names(&Chord::parse("C/E").unwrap().notes()), ["E", "G", "C"]);
        assert_eq!(names(&Chord::parse("D7/C").unwrap().notes()), ["C", "D", "F#", "A"]);
    }

    #[test]
    fn foreign_bass_is_prepended() {
        assert_eq!(names(&Chord::parse("C/D").unwrap().notes()), ["D", "C", "E", "G"]);
    }
}
