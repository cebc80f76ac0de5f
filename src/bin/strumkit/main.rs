//! strumkit - chord theory and strummed keys from the terminal
//!
//! Run with: cargo run -- play Am7

mod cli;

use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use strumkit::{
    io::{backend, write_wav},
    theory::{self, Chord},
    EngineConfig, Strumkit,
};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strumkit=info")),
        )
        .init();

    let cli = Cli::parse();
    let speed = cli.speed;

    match cli.command {
        Command::Spell { pitch_class, key } => {
            println!("{}", theory::spell_note(pitch_class, key));
        }
        Command::Roman {
            offset,
            quality,
            bass,
        } => {
            println!("{}", theory::roman_numeral_over(offset, &quality, bass));
        }
        Command::Intervals { quality } => {
            let semitones = theory::resolve_quality(&quality);
            let labels = theory::interval_labels(&quality);
            for (semitone, label) in semitones.iter().zip(labels) {
                println!("{semitone:>2}  {label}");
            }
        }
        Command::Voice { symbol } => voice(&symbol)?,
        Command::Play { symbol } => {
            let kit = Strumkit::live(EngineConfig::default());
            let strings = kit.play_chord_by_name(&symbol, speed);
            ring_out(&kit, strings, speed);
        }
        Command::PlayDegree {
            offset,
            quality,
            key,
        } => {
            let kit = Strumkit::live(EngineConfig::default());
            let strings = kit.play_chord(key, offset, &quality, speed);
            ring_out(&kit, strings, speed);
        }
        Command::Sequence { symbols, delay } => sequence(symbols, delay, speed),
        Command::Bounce {
            symbol,
            output,
            sample_rate,
        } => {
            let config = EngineConfig::default().with_sample_rate(sample_rate);
            let kit = Strumkit::offline(config.clone());
            let strings = kit.play_chord_by_name(&symbol, speed);
            if strings == 0 {
                return Err(eyre!("{symbol:?} is not a playable chord"));
            }

            let seconds = config.ring_time(strings, speed) + 0.5;
            let samples = kit.with_engine(|engine| engine.sink_mut().render_until_silent(seconds));
            write_wav(&output, &samples, sample_rate as u32)
                .wrap_err_with(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} -> {} ({:.2}s)",
                symbol,
                output.display(),
                samples.len() as f32 / sample_rate
            );
        }
        #[cfg(feature = "suggest")]
        Command::Suggest {
            symbol,
            key,
            context,
            lang,
            endpoint,
        } => suggest(symbol, key, context, lang, endpoint),
    }

    Ok(())
}

fn voice(symbol: &str) -> Result<()> {
    let chord = Chord::parse(symbol).wrap_err("Failed to parse chord symbol")?;
    let notes: Vec<String> = chord.notes().iter().map(ToString::to_string).collect();
    println!("{symbol}: {}", notes.join(" "));

    for pitch in theory::voice_notes(&chord.notes(), chord.bass_note()) {
        println!(
            "  {}{:<3} {:>3}  {:>7.2} Hz",
            pitch.name,
            pitch.octave,
            pitch.pitch,
            theory::pitch_to_frequency(pitch.pitch)
        );
    }
    Ok(())
}

/// Keep the process alive until the last string has decayed.
fn ring_out<S>(kit: &Strumkit<S>, strings: usize, speed: f32)
where
    S: strumkit::synth::VoiceSink + 'static,
{
    if strings == 0 {
        println!("nothing to play");
    } else {
        let seconds = kit.with_engine(|engine| engine.config().ring_time(strings, speed));
        thread::sleep(Duration::from_secs_f32(seconds));
    }
    backend::shutdown();
}

fn sequence(symbols: Vec<String>, delay: f32, speed: f32) {
    let kit = Arc::new(Strumkit::live(EngineConfig::default()));
    if !kit.start_sequence(symbols, delay, speed) {
        println!("nothing to play");
        return;
    }
    println!("playing, press Enter to stop");

    let stopper = Arc::clone(&kit);
    thread::spawn(move || {
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_ok() {
            stopper.stop_sequence();
        }
    });

    if let Some(outcome) = kit.wait_for_sequence() {
        println!(
            "{} chord(s) played{}",
            outcome.played,
            if outcome.cancelled { ", stopped" } else { "" }
        );
    }

    // Let the last strum finish its tail
    ring_out(&kit, 1, speed);
}

#[cfg(feature = "suggest")]
fn suggest(symbol: String, key: String, context: String, lang: String, endpoint: Option<String>) {
    use strumkit::suggest::{
        suggestions_or_empty, HttpSuggestionSource, SuggestionRequest,
    };

    let source = match endpoint {
        Some(url) => HttpSuggestionSource::new(url),
        None => match HttpSuggestionSource::from_env() {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(%err, "no suggestions");
                println!("no suggestions");
                return;
            }
        },
    };

    let request = SuggestionRequest::new(symbol, key)
        .with_context(context)
        .with_language(lang);
    let suggestions = suggestions_or_empty(&source, &request);
    if suggestions.is_empty() {
        println!("no suggestions");
    }
    for suggestion in suggestions {
        println!(
            "{:<10} {:<8} [{}] {}",
            suggestion.chord_symbol,
            suggestion.roman_numeral,
            suggestion.confidence_tag,
            suggestion.explanation
        );
    }
}
