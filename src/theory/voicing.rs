use tracing::debug;

use crate::theory::pitch::NoteName;

/*
Voice Leading
=============

Turns an unordered set of note names into concrete pitches that stack upward
from a bass note, the way a keyboard player would grab a close voicing.

Algorithm
---------

1. The bass leads. If it is already among the notes, the list is rotated so
   it comes first; otherwise it is prepended.

2. The bass starts in octave 3 and is shifted by whole octaves until it lands
   in the bass band [45, 57] (A2..A3).

3. Every following note starts in octave 3 and moves up an octave at a time
   until it sits strictly above the previous note.

4. Octave clamp: a note pushed past octave 5 is put back in octave 4. This
   keeps very wide chords (13ths over a high bass) from climbing off the top
   of the keyboard. It is a heuristic: a clamped note can end up below its
   neighbour, so strict ascent is only guaranteed when no clamp fires, which
   holds for triads, sevenths and slash chords of up to five tones.

    E.g. C/E  ->  [E, G, C]
         E:  E3 = 52            in [45, 57]      -> E3
         G:  G3 = 55 > 52                        -> G3
         C:  C3 = 48 <= 55  ->  C4 = 60 > 55     -> C4
*/

/// Lowest allowed bass pitch (A2).
pub const BASS_FLOOR: i32 = 45;
/// Highest allowed bass pitch (A3).
pub const BASS_CEILING: i32 = 57;

const START_OCTAVE: i32 = 3;
const OCTAVE_CEILING: i32 = 5;
const CLAMP_OCTAVE: i32 = 4;

/// A note name placed in a specific octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicedPitch {
    pub name: NoteName,
    pub octave: i32,
    /// MIDI-style pitch number of `name` in `octave`.
    pub pitch: i32,
}

impl VoicedPitch {
    fn new(name: NoteName, octave: i32) -> Self {
        Self {
            name,
            octave,
            pitch: name.pitch_number(octave),
        }
    }
}

/// Put the bass first: rotate it to the front, or prepend it if it is foreign.
fn bass_first(notes: &[NoteName], bass: NoteName) -> Vec<NoteName> {
    let mut ordered = notes.to_vec();
    match ordered
        .iter()
        .position(|note| note.pitch_class() == bass.pitch_class())
    {
        Some(index) => ordered.rotate_left(index),
        None => ordered.insert(0, bass),
    }
    ordered
}

fn place_bass(name: NoteName) -> VoicedPitch {
    let mut octave = START_OCTAVE;
    while name.pitch_number(octave) < BASS_FLOOR {
        octave += 1;
    }
    while name.pitch_number(octave) > BASS_CEILING {
        octave -= 1;
    }
    VoicedPitch::new(name, octave)
}

fn place_above(name: NoteName, previous: i32) -> VoicedPitch {
    let mut octave = START_OCTAVE;
    while name.pitch_number(octave) <= previous {
        octave += 1;
    }
    if octave > OCTAVE_CEILING {
        octave = CLAMP_OCTAVE;
    }
    VoicedPitch::new(name, octave)
}

/// Assign octaves to `notes` so they stack upward from `bass`.
pub fn voice_notes(notes: &[NoteName], bass: NoteName) -> Vec<VoicedPitch> {
    let ordered = bass_first(notes, bass);
    let mut voiced: Vec<VoicedPitch> = Vec::with_capacity(ordered.len());

    for name in ordered {
        let placed = match voiced.last() {
            None => place_bass(name),
            Some(previous) => place_above(name, previous.pitch),
        };
        voiced.push(placed);
    }

    voiced
}

/// String-level voice leading: `(name, octave)` pairs, bass first.
///
/// Names that do not parse are dropped. An unparseable bass leaves the order
/// as given, so the first valid note leads.
pub fn voice_lead<S: AsRef<str>>(note_names: &[S], bass: &str) -> Vec<(String, i32)> {
    let notes: Vec<NoteName> = note_names
        .iter()
        .filter_map(|name| match name.as_ref().parse::<NoteName>() {
            Ok(note) => Some(note),
            Err(err) => {
                debug!(%err, "dropping unresolvable note");
                None
            }
        })
        .collect();

    let Some(&first) = notes.first() else {
        return Vec::new();
    };
    let bass = bass.parse::<NoteName>().unwrap_or(first);

    voice_notes(&notes, bass)
        .into_iter()
        .map(|voiced| (voiced.name.to_string(), voiced.octave))
        .collect()
}
