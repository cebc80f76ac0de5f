use tracing::debug;

/*
Chord Qualities
===============

The quality is everything after the root in a chord symbol: "m7" in Am7,
"maj7#11" in Fmaj7#11, "" in plain C. Each recognized quality maps to a fixed
list of intervals above the root.

Every interval carries two numbers:

  semitones   distance from the root (m3 = 3, 9 = 14)
  degree      which scale step it sits on (m3 = 3rd, 9 = 9th)

The degree is what lets chord tones be spelled properly: a minor third above
Eb must be written Gb (a kind of G), never F#.

Unrecognized tokens are not errors. They resolve to the plain major triad so
a typo in a chart still produces a sound.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    semitones: u8,
    degree: u8,
}

impl Interval {
    pub const fn new(semitones: u8, degree: u8) -> Self {
        Self { semitones, degree }
    }

    pub fn semitones(self) -> u8 {
        self.semitones
    }

    pub fn degree(self) -> u8 {
        self.degree
    }

    pub fn label(self) -> String {
        interval_label(self.semitones as i32)
    }
}

const ROOT: Interval = Interval::new(0, 1);
const MAJ2: Interval = Interval::new(2, 2);
const MIN3: Interval = Interval::new(3, 3);
const MAJ3: Interval = Interval::new(4, 3);
const P4: Interval = Interval::new(5, 4);
const DIM5: Interval = Interval::new(6, 5);
const P5: Interval = Interval::new(7, 5);
const AUG5: Interval = Interval::new(8, 5);
const MAJ6: Interval = Interval::new(9, 6);
const DIM7: Interval = Interval::new(9, 7);
const MIN7: Interval = Interval::new(10, 7);
const MAJ7: Interval = Interval::new(11, 7);
const MIN9: Interval = Interval::new(13, 9);
const MAJ9: Interval = Interval::new(14, 9);
const AUG9: Interval = Interval::new(15, 9);
const P11: Interval = Interval::new(17, 11);
const AUG11: Interval = Interval::new(18, 11);
const MIN13: Interval = Interval::new(20, 13);
const MAJ13: Interval = Interval::new(21, 13);

/// Ordered intervals above a chord root. Never empty, always starts at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: &'static [Interval],
}

impl IntervalSet {
    pub fn intervals(&self) -> &'static [Interval] {
        self.intervals
    }

    pub fn semitones(&self) -> Vec<u8> {
        self.intervals.iter().map(|i| i.semitones()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.intervals.iter().map(|i| i.label()).collect()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Recognized chord quality categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Power,
    Major6,
    Minor6,
    SixNine,
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    HalfDiminished7,
    Diminished7,
    Augmented7,
    Dominant7Flat5,
    Dominant7Sus4,
    Add9,
    MinorAdd9,
    Dominant9,
    Major9,
    Minor9,
    Dominant9Sus4,
    Dominant7Flat9,
    Dominant7Sharp9,
    Dominant7Sharp11,
    Dominant7Flat13,
    Dominant11,
    Minor11,
    Major7Sharp11,
    Dominant13,
    Major13,
    Minor13,
    MinorSixNine,
    Major7Flat5,
    Major7Sharp5,
    Minor7Sharp5,
    MinorMajor9,
    Minor7Add11,
    Add11,
    Dominant9Flat5,
    Dominant9Sharp5,
    Minor9Flat5,
    Dominant9Sharp11,
    Major9Sharp11,
    Dominant7Sus4Flat9,
    Dominant7Sharp5Flat9,
    Dominant7Sharp5Sharp9,
    Dominant7Flat5Flat9,
    Dominant7Flat5Sharp9,
    Dominant7Flat9Sharp11,
    Dominant7Flat9Flat13,
    Dominant7Sharp9Sharp11,
    Dominant7Sharp9Flat13,
    Altered,
    Dominant13Flat9,
    Dominant13Sharp9,
    Dominant13Sharp11,
    Dominant13Sus4,
}

impl ChordQuality {
    /// Look up a quality token, including its common aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        use ChordQuality::*;

        let quality = match token.trim() {
            "" | "M" | "maj" | "Maj" | "major" | "^" => Major,
            "m" | "min" | "mi" | "-" | "minor" => Minor,
            "dim" | "°" | "o" => Diminished,
            "aug" | "+" | "+5" | "#5" => Augmented,
            "sus2" => Sus2,
            "sus4" | "sus" => Sus4,
            "5" => Power,
            "6" | "M6" | "add6" | "add13" => Major6,
            "m6" | "-6" | "min6" => Minor6,
            "69" | "6/9" | "6add9" | "M69" => SixNine,
            "7" | "dom" | "dom7" => Dominant7,
            "maj7" | "Maj7" | "M7" | "ma7" | "Δ" | "Δ7" | "^7" => Major7,
            "m7" | "min7" | "mi7" | "-7" => Minor7,
            "mMaj7" | "mM7" | "mmaj7" | "m(maj7)" | "-Δ7" | "-^7" => MinorMajor7,
            "m7b5" | "m7(b5)" | "-7b5" | "ø" | "ø7" | "h7" => HalfDiminished7,
            "dim7" | "°7" | "o7" => Diminished7,
            "aug7" | "7#5" | "+7" | "7+5" => Augmented7,
            "7b5" | "7(b5)" => Dominant7Flat5,
            "7sus4" | "7sus" => Dominant7Sus4,
            "add9" | "Madd9" | "2" | "add2" => Add9,
            "madd9" | "m(add9)" | "-add9" => MinorAdd9,
            "9" => Dominant9,
            "maj9" | "Maj9" | "M9" | "Δ9" | "^9" => Major9,
            "m9" | "min9" | "-9" => Minor9,
            "9sus4" | "9sus" => Dominant9Sus4,
            "7b9" | "7(b9)" => Dominant7Flat9,
            "7#9" | "7(#9)" => Dominant7Sharp9,
            "7#11" | "7(#11)" => Dominant7Sharp11,
            "7b13" | "7(b13)" => Dominant7Flat13,
            "11" => Dominant11,
            "m11" | "min11" | "-11" => Minor11,
            "maj7#11" | "M7#11" | "Δ#11" | "^7#11" => Major7Sharp11,
            "13" => Dominant13,
            "maj13" | "Maj13" | "M13" | "Δ13" | "^13" => Major13,
            "m13" | "min13" | "-13" => Minor13,
            "m69" | "m6/9" | "-69" | "m6add9" => MinorSixNine,
            "maj7b5" | "M7b5" | "Δb5" | "maj7(b5)" => Major7Flat5,
            "maj7#5" | "M7#5" | "maj7+5" | "+maj7" | "augmaj7" | "maj7(#5)" => Major7Sharp5,
            "m7#5" | "m7+5" | "-7#5" | "m7(#5)" => Minor7Sharp5,
            "mMaj9" | "mM9" | "mmaj9" | "m(maj9)" | "-Δ9" | "-^9" => MinorMajor9,
            "m7add11" | "m7(add11)" | "-7add11" => Minor7Add11,
            "add11" | "Madd11" => Add11,
            "9b5" | "9(b5)" => Dominant9Flat5,
            "9#5" | "9+5" | "aug9" | "+9" => Dominant9Sharp5,
            "m9b5" | "m9(b5)" | "-9b5" => Minor9Flat5,
            "9#11" | "9(#11)" => Dominant9Sharp11,
            "maj9#11" | "M9#11" | "Δ9#11" | "^9#11" => Major9Sharp11,
            "7sus4b9" | "7susb9" | "7b9sus" | "7b9sus4" => Dominant7Sus4Flat9,
            "7#5b9" | "7b9#5" | "7+5b9" => Dominant7Sharp5Flat9,
            "7#5#9" | "7#9#5" | "7+5#9" => Dominant7Sharp5Sharp9,
            "7b5b9" | "7b9b5" => Dominant7Flat5Flat9,
            "7b5#9" | "7#9b5" => Dominant7Flat5Sharp9,
            "7b9#11" | "7#11b9" => Dominant7Flat9Sharp11,
            "7b9b13" | "7b13b9" => Dominant7Flat9Flat13,
            "7#9#11" | "7#11#9" => Dominant7Sharp9Sharp11,
            "7#9b13" | "7b13#9" => Dominant7Sharp9Flat13,
            "7alt" | "alt" | "alt7" => Altered,
            "13b9" | "13(b9)" => Dominant13Flat9,
            "13#9" | "13(#9)" => Dominant13Sharp9,
            "13#11" | "13(#11)" => Dominant13Sharp11,
            "13sus4" | "13sus" => Dominant13Sus4,
            _ => return None,
        };

        Some(quality)
    }

    /// Resolve a token, falling back to the major triad when it is unknown.
    pub fn resolve(token: &str) -> Self {
        match Self::from_token(token) {
            Some(quality) => quality,
            None => {
                debug!(token, "unrecognized chord quality, using major triad");
                ChordQuality::Major
            }
        }
    }

    pub fn intervals(self) -> IntervalSet {
        use ChordQuality::*;

        let intervals: &'static [Interval] = match self {
            Major => &[ROOT, MAJ3, P5],
            Minor => &[ROOT, MIN3, P5],
            Diminished => &[ROOT, MIN3, DIM5],
            Augmented => &[ROOT, MAJ3, AUG5],
            Sus2 => &[ROOT, MAJ2, P5],
            Sus4 => &[ROOT, P4, P5],
            Power => &[ROOT, P5],
            Major6 => &[ROOT, MAJ3, P5, MAJ6],
            Minor6 => &[ROOT, MIN3, P5, MAJ6],
            SixNine => &[ROOT, MAJ3, P5, MAJ6, MAJ9],
            Dominant7 => &[ROOT, MAJ3, P5, MIN7],
            Major7 => &[ROOT, MAJ3, P5, MAJ7],
            Minor7 => &[ROOT, MIN3, P5, MIN7],
            MinorMajor7 => &[ROOT, MIN3, P5, MAJ7],
            HalfDiminished7 => &[ROOT, MIN3, DIM5, MIN7],
            Diminished7 => &[ROOT, MIN3, DIM5, DIM7],
            Augmented7 => &[ROOT, MAJ3, AUG5, MIN7],
            Dominant7Flat5 => &[ROOT, MAJ3, DIM5, MIN7],
            Dominant7Sus4 => &[ROOT, P4, P5, MIN7],
            Add9 => &[ROOT, MAJ3, P5, MAJ9],
            MinorAdd9 => &[ROOT, MIN3, P5, MAJ9],
            Dominant9 => &[ROOT, MAJ3, P5, MIN7, MAJ9],
            Major9 => &[ROOT, MAJ3, P5, MAJ7, MAJ9],
            Minor9 => &[ROOT, MIN3, P5, MIN7, MAJ9],
            Dominant9Sus4 => &[ROOT, P4, P5, MIN7, MAJ9],
            Dominant7Flat9 => &[ROOT, MAJ3, P5, MIN7, MIN9],
            Dominant7Sharp9 => &[ROOT, MAJ3, P5, MIN7, AUG9],
            Dominant7Sharp11 => &[ROOT, MAJ3, P5, MIN7, AUG11],
            Dominant7Flat13 => &[ROOT, MAJ3, P5, MIN7, MIN13],
            Dominant11 => &[ROOT, P5, MIN7, MAJ9, P11],
            Minor11 => &[ROOT, MIN3, P5, MIN7, MAJ9, P11],
            Major7Sharp11 => &[ROOT, MAJ3, P5, MAJ7, AUG11],
            Dominant13 => &[ROOT, MAJ3, P5, MIN7, MAJ9, MAJ13],
            Major13 => &[ROOT, MAJ3, P5, MAJ7, MAJ9, MAJ13],
            Minor13 => &[ROOT, MIN3, P5, MIN7, MAJ9, P11, MAJ13],
            MinorSixNine => &[ROOT, MIN3, P5, MAJ6, MAJ9],
            Major7Flat5 => &[ROOT, MAJ3, DIM5, MAJ7],
            Major7Sharp5 => &[ROOT, MAJ3, AUG5, MAJ7],
            Minor7Sharp5 => &[ROOT, MIN3, AUG5, MIN7],
            MinorMajor9 => &[ROOT, MIN3, P5, MAJ7, MAJ9],
            Minor7Add11 => &[ROOT, MIN3, P5, MIN7, P11],
            Add11 => &[ROOT, MAJ3, P5, P11],
            Dominant9Flat5 => &[ROOT, MAJ3, DIM5, MIN7, MAJ9],
            Dominant9Sharp5 => &[ROOT, MAJ3, AUG5, MIN7, MAJ9],
            Minor9Flat5 => &[ROOT, MIN3, DIM5, MIN7, MAJ9],
            Dominant9Sharp11 => &[ROOT, MAJ3, P5, MIN7, MAJ9, AUG11],
            Major9Sharp11 => &[ROOT, MAJ3, P5, MAJ7, MAJ9, AUG11],
            Dominant7Sus4Flat9 => &[ROOT, P4, P5, MIN7, MIN9],
            Dominant7Sharp5Flat9 => &[ROOT, MAJ3, AUG5, MIN7, MIN9],
            Dominant7Sharp5Sharp9 => &[ROOT, MAJ3, AUG5, MIN7, AUG9],
            Dominant7Flat5Flat9 => &[ROOT, MAJ3, DIM5, MIN7, MIN9],
            Dominant7Flat5Sharp9 => &[ROOT, MAJ3, DIM5, MIN7, AUG9],
            Dominant7Flat9Sharp11 => &[ROOT, MAJ3, P5, MIN7, MIN9, AUG11],
            Dominant7Flat9Flat13 => &[ROOT, MAJ3, P5, MIN7, MIN9, MIN13],
            Dominant7Sharp9Sharp11 => &[ROOT, MAJ3, P5, MIN7, AUG9, AUG11],
            Dominant7Sharp9Flat13 => &[ROOT, MAJ3, P5, MIN7, AUG9, MIN13],
            // No fifth; every altered tension over 3 and b7
            Altered => &[ROOT, MAJ3, MIN7, MIN9, AUG9, AUG11, MIN13],
            Dominant13Flat9 => &[ROOT, MAJ3, P5, MIN7, MIN9, MAJ13],
            Dominant13Sharp9 => &[ROOT, MAJ3, P5, MIN7, AUG9, MAJ13],
            Dominant13Sharp11 => &[ROOT, MAJ3, P5, MIN7, MAJ9, AUG11, MAJ13],
            Dominant13Sus4 => &[ROOT, P4, P5, MIN7, MAJ9, MAJ13],
        };

        IntervalSet { intervals }
    }
}

/// Semitone offsets for a quality token; unknown tokens give `[0, 4, 7]`.
pub fn resolve_quality(quality: &str) -> Vec<u8> {
    ChordQuality::resolve(quality).intervals().semitones()
}

/// Conventional extension name for a semitone distance from the root.
pub fn interval_label(semitones: i32) -> String {
    let label = match semitones {
        0 | 12 => "R",
        1 | 13 => "b9",
        2 | 14 => "9",
        3 => "m3",
        4 => "3",
        5 | 17 => "11",
        6 | 18 => "#11",
        7 => "5",
        8 | 20 => "b13",
        9 | 21 => "13",
        10 => "b7",
        11 => "maj7",
        15 => "#9",
        other => return other.to_string(),
    };
    label.to_string()
}

/// Labels for every interval of a quality token.
pub fn interval_labels(quality: &str) -> Vec<String> {
    ChordQuality::resolve(quality).intervals().labels()
}
