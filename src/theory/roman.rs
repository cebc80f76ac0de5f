//! Roman-numeral labels for chords relative to the key root.

const NUMERALS: [&str; 12] = [
    "I", "bII", "II", "bIII", "III", "IV", "#IV", "V", "bVI", "VI", "bVII", "VII",
];

/// Minor and diminished chords take a lower-case numeral.
pub fn is_lower_case_function(quality: &str) -> bool {
    let minor = quality.starts_with('m') && !quality.starts_with("maj");
    minor || quality.starts_with("dim")
}

fn numeral(root_offset: i32, quality: &str) -> String {
    let base = NUMERALS[root_offset.rem_euclid(12) as usize];
    if is_lower_case_function(quality) {
        base.to_lowercase()
    } else {
        base.to_string()
    }
}

/// Numeral for a chord `root_offset` semitones above the key root, followed by
/// the quality verbatim (offset 9, "m7" gives "vim7").
pub fn roman_numeral(root_offset: i32, quality: &str) -> String {
    format!("{}{}", numeral(root_offset, quality), quality)
}

/// Like [`roman_numeral`], adding `/bass` when the chord names a bass note.
pub fn roman_numeral_over(root_offset: i32, quality: &str, bass_offset: Option<i32>) -> String {
    let main = roman_numeral(root_offset, quality);
    match bass_offset {
        Some(bass) => format!("{main}/{}", numeral(bass, "")),
        None => main,
    }
}
