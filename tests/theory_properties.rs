use strumkit::theory::{
    resolve_quality, roman_numeral, roman_numeral_over, spell_note, transpose_note, voice_lead,
    voice_notes, Chord, VoicedPitch,
};

const SHARP_KEYS: [i32; 7] = [7, 2, 9, 4, 11, 6, 1];

fn pitches(voiced: &[VoicedPitch]) -> Vec<i32> {
    voiced.iter().map(|v| v.pitch).collect()
}

fn voiced(symbol: &str) -> Vec<VoicedPitch> {
    let chord = Chord::parse(symbol).unwrap();
    voice_notes(&chord.notes(), chord.bass_note())
}

#[test]
fn spelling_follows_key_signature() {
    assert_eq!(spell_note((7 + 7) % 12, 7).to_string(), "D");

    for key in 0..12 {
        for pitch_class in 0..12 {
            let note = spell_note(pitch_class, key);
            let name = note.to_string();
            assert_eq!(i32::from(note.pitch_class().value()), pitch_class);

            if SHARP_KEYS.contains(&key) {
                assert!(!name.contains('b'), "{name} in key {key}");
            } else {
                assert!(!name.contains('#'), "{name} in key {key}");
            }
        }
    }
}

#[test]
fn transposition_wraps_the_octave() {
    assert_eq!(transpose_note(7, 5).to_string(), "C");
    assert_eq!(transpose_note(2, 4).to_string(), "F#");
    assert_eq!(transpose_note(5, 5).to_string(), "Bb");
    assert_eq!(transpose_note(0, -1).to_string(), "B");
}

#[test]
fn qualities_resolve_to_semitones() {
    assert_eq!(resolve_quality(""), [0, 4, 7]);
    assert_eq!(resolve_quality("m7"), [0, 3, 7, 10]);
    assert_eq!(resolve_quality("m7b5"), [0, 3, 6, 10]);
    assert_eq!(resolve_quality("unknown-garbage"), [0, 4, 7]);
    assert_eq!(resolve_quality("maj7"), resolve_quality("maj7"));
}

#[test]
fn roman_numerals() {
    assert_eq!(roman_numeral(2, ""), "II");
    assert_eq!(roman_numeral(9, "m7"), "vim7");
    assert_eq!(roman_numeral(7, ""), "V");
    assert_eq!(roman_numeral_over(0, "", Some(4)), "I/III");
}

#[test]
fn voicings_ascend_from_the_bass_band() {
    let qualities = ["", "m", "dim", "aug", "7", "maj7", "m7", "m7b5", "dim7", "sus4"];

    for root in 0..12 {
        let root_name = transpose_note(0, root).to_string();
        for quality in qualities {
            let plain = format!("{root_name}{quality}");
            let tones = Chord::parse(&plain).unwrap().tones();
            let mut symbols = vec![plain.clone()];
            for tone in &tones[1..] {
                symbols.push(format!("{plain}/{tone}"));
            }
            symbols.push(format!("{plain}/{}", transpose_note(root, 2)));

            for symbol in symbols {
                let voicing = voiced(&symbol);
                let pitches = pitches(&voicing);
                assert!(
                    (45..=57).contains(&pitches[0]),
                    "{symbol}: bass {}",
                    pitches[0]
                );
                assert!(
                    pitches.windows(2).all(|w| w[1] > w[0]),
                    "{symbol}: {pitches:?}"
                );
                assert_eq!(voicing, voiced(&symbol), "{symbol} is not stable");
            }
        }
    }
}

#[test]
fn slash_chords_put_the_bass_first() {
    let names: Vec<String> = Chord::parse("Ebm7b5/A")
        .unwrap()
        .notes()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, ["A", "Eb", "Gb", "Bbb", "Db"]);

    assert_eq!(
        voice_lead(&["C", "E", "G"], "E"),
        [
            ("E".to_string(), 3),
            ("G".to_string(), 3),
            ("C".to_string(), 4)
        ]
    );
}
