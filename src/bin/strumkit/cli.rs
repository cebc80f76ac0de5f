use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strumkit::theory::NoteName;

/// Chord theory helpers and a strummed keys synth
#[derive(Parser)]
#[command(name = "strumkit", version)]
#[command(about = "Spell, analyse and strum chords from the terminal")]
pub struct Cli {
    /// Playback speed; strums and sequences run faster above 1.0
    #[arg(long, global = true, default_value_t = 1.0)]
    pub speed: f32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Spell a pitch class (0 = C) in a key
    Spell {
        pitch_class: i32,
        #[arg(long, default_value = "C", value_parser = parse_key)]
        key: i32,
    },

    /// Roman numeral of a chord `offset` semitones above the key root
    Roman {
        offset: i32,
        #[arg(default_value = "")]
        quality: String,
        /// Semitone offset of a slash bass
        #[arg(long)]
        bass: Option<i32>,
    },

    /// List the intervals of a chord quality
    Intervals {
        #[arg(default_value = "")]
        quality: String,
    },

    /// Show how a chord symbol is voiced
    Voice { symbol: String },

    /// Strum a chord symbol through the sound card
    Play { symbol: String },

    /// Strum the chord `offset` semitones above the key root
    PlayDegree {
        offset: i32,
        #[arg(default_value = "")]
        quality: String,
        #[arg(long, default_value = "C", value_parser = parse_key)]
        key: i32,
    },

    /// Play a progression, one chord every `delay` seconds (Enter stops)
    Sequence {
        #[arg(required = true)]
        symbols: Vec<String>,
        #[arg(long, default_value_t = 1.5)]
        delay: f32,
    },

    /// Render a strummed chord to a WAV file
    Bounce {
        symbol: String,
        output: PathBuf,
        #[arg(long, default_value_t = 48_000.0)]
        sample_rate: f32,
    },

    /// Ask the suggestion service what could follow a chord
    #[cfg(feature = "suggest")]
    Suggest {
        symbol: String,
        #[arg(long, default_value = "C major")]
        key: String,
        #[arg(long, default_value = "")]
        context: String,
        #[arg(long, default_value = "en")]
        lang: String,
        /// Service URL; falls back to STRUMKIT_SUGGEST_URL
        #[arg(long)]
        endpoint: Option<String>,
    },
}

/// Accept a key as a note name (`Eb`) or a pitch class (`3`).
fn parse_key(text: &str) -> Result<i32, String> {
    if let Ok(pitch_class) = text.parse::<i32>() {
        return Ok(pitch_class.rem_euclid(12));
    }
    text.parse::<NoteName>()
        .map(|note| note.pitch_class().value() as i32)
        .map_err(|err| err.to_string())
}
