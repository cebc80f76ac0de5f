use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/*
Pitch Classes and Note Names
============================

A pitch class is one of the twelve semitone slots of the octave, ignoring
which octave a note sits in. 0 = C, 1 = C#/Db, ... 11 = B.

A note name is how a pitch class is *written*: a letter plus zero or more
accidentals. The same pitch class can be written several ways (C# and Db are
both pitch class 1), so spelling depends on context.

Key Context
-----------

Chord-chart display spelling follows a single rule per key: keys whose root
is G, D, A, E, B, F# or C# use sharps for every chromatic note, all other
keys use flats.

    key root   table    pitch class 1
    C  (0)     flats    Db
    D  (2)     sharps   C#
    F  (5)     flats    Db

Pitch Numbers
-------------

Absolute pitch uses MIDI numbering, where octave 4 starts at middle C:

    pitch_number = 12 * (octave + 1) + letter_semitone + accidental

The accidental is NOT wrapped into the octave, so B#3 is 60 (same as C4) and
Cb4 is 59 (same as B3). The octave number belongs to the letter.
*/

const FLAT_SPELLINGS: [NoteName; 12] = [
    NoteName::new(Letter::C, 0),
    NoteName::new(Letter::D, -1),
    NoteName::new(Letter::D, 0),
    NoteName::new(Letter::E, -1),
    NoteName::new(Letter::E, 0),
    NoteName::new(Letter::F, 0),
    NoteName::new(Letter::G, -1),
    NoteName::new(Letter::G, 0),
    NoteName::new(Letter::A, -1),
    NoteName::new(Letter::A, 0),
    NoteName::new(Letter::B, -1),
    NoteName::new(Letter::B, 0),
];

const SHARP_SPELLINGS: [NoteName; 12] = [
    NoteName::new(Letter::C, 0),
    NoteName::new(Letter::C, 1),
    NoteName::new(Letter::D, 0),
    NoteName::new(Letter::D, 1),
    NoteName::new(Letter::E, 0),
    NoteName::new(Letter::F, 0),
    NoteName::new(Letter::F, 1),
    NoteName::new(Letter::G, 0),
    NoteName::new(Letter::G, 1),
    NoteName::new(Letter::A, 0),
    NoteName::new(Letter::A, 1),
    NoteName::new(Letter::B, 0),
];

/// Key roots (G, D, A, E, B, F#, C#) spelled with sharps.
pub const SHARP_KEYS: [u8; 7] = [7, 2, 9, 4, 11, 6, 1];

/// One of the twelve pitch classes, always in `0..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Normalize any integer into `0..12`.
    pub fn new(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones.rem_euclid(12))
    }

    /// True when a key rooted on this pitch class is spelled with sharps.
    pub fn is_sharp_key(self) -> bool {
        SHARP_KEYS.contains(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitones above C of the natural (unaltered) letter.
    pub fn natural_semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The letter `steps` staff positions above this one (C + 2 = E).
    pub fn step(self, steps: usize) -> Letter {
        Self::ALL[(self.index() + steps) % 7]
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// A written note: letter plus signed accidental count (+1 = sharp, -1 = flat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    letter: Letter,
    accidental: i8,
}

const MAX_ACCIDENTALS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid note name {0:?}")]
pub struct InvalidNoteName(pub String);

impl NoteName {
    pub const fn new(letter: Letter, accidental: i8) -> Self {
        Self { letter, accidental }
    }

    pub fn letter(self) -> Letter {
        self.letter
    }

    pub fn accidental(self) -> i8 {
        self.accidental
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::new(self.letter.natural_semitone() + self.accidental as i32)
    }

    /// Absolute pitch number in `octave` (MIDI numbering, C4 = 60).
    pub fn pitch_number(self, octave: i32) -> i32 {
        12 * (octave + 1) + self.letter.natural_semitone() + self.accidental as i32
    }

    /// Spell the note `semitones` above this one on the given scale degree.
    ///
    /// The degree fixes the letter (a third above C is some kind of E), the
    /// semitone distance fixes the accidental. Eb + (3, 3rd) = Gb.
    pub fn spell_above(self, semitones: i32, degree: u8) -> NoteName {
        let letter = self.letter.step(degree.saturating_sub(1) as usize);
        let target =
            self.letter.natural_semitone() + self.accidental as i32 + semitones;
        let mut accidental = (target - letter.natural_semitone()).rem_euclid(12);
        if accidental > 6 {
            accidental -= 12;
        }
        NoteName::new(letter, accidental as i8)
    }

    /// Parse a leading note name and return it with the unconsumed remainder.
    ///
    /// Accepts an upper or lower case letter followed by `#`/`♯` or `b`/`♭`
    /// accidentals (up to three).
    pub fn parse_prefix(text: &str) -> Option<(NoteName, &str)> {
        let mut chars = text.char_indices();
        let (_, first) = chars.next()?;
        let letter = Letter::from_char(first)?;

        let mut accidental: i8 = 0;
        let mut count = 0;
        let mut rest = &text[first.len_utf8()..];
        for (index, c) in chars {
            let delta = match c {
                '#' | '♯' => 1,
                'b' | '♭' => -1,
                _ => break,
            };
            if count == MAX_ACCIDENTALS {
                break;
            }
            accidental += delta;
            count += 1;
            rest = &text[index + c.len_utf8()..];
        }

        Some((NoteName::new(letter, accidental), rest))
    }
}

impl FromStr for NoteName {
    type Err = InvalidNoteName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match NoteName::parse_prefix(trimmed) {
            Some((note, rest)) if rest.is_empty() => Ok(note),
            _ => Err(InvalidNoteName(s.to_string())),
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        let symbol = if self.accidental > 0 { "#" } else { "b" };
        for _ in 0..self.accidental.unsigned_abs() {
            f.write_str(symbol)?;
        }
        Ok(())
    }
}

/// Convert an absolute pitch number to Hz (A4 = 69 = 440 Hz).
#[inline]
pub fn pitch_to_frequency(pitch: i32) -> f32 {
    440.0 * 2.0_f32.powf((pitch as f32 - 69.0) / 12.0)
}

/// Look up the spelling of a pitch class in the sharp or flat table.
pub fn spell(pitch_class: PitchClass, use_sharps: bool) -> NoteName {
    let table = if use_sharps {
        &SHARP_SPELLINGS
    } else {
        &FLAT_SPELLINGS
    };
    table[pitch_class.value() as usize]
}

/// Spell `pitch_class` the way the key rooted on `key_root` writes it.
pub fn spell_note(pitch_class: i32, key_root: i32) -> NoteName {
    spell(
        PitchClass::new(pitch_class),
        PitchClass::new(key_root).is_sharp_key(),
    )
}

/// Spell the note `offset` semitones above the key root, in that key.
pub fn transpose_note(key_root: i32, offset: i32) -> NoteName {
    let root = PitchClass::new(key_root);
    spell(root.transpose(offset), root.is_sharp_key())
}
