use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::{
    config::EngineConfig,
    sequencing::{ChordTrigger, PlayerState, SequenceOutcome, SequencePlayer, SequenceState},
    synth::{
        engine::{normalize_speed, SynthesisEngine, VoiceSink},
        offline::OfflineRenderer,
    },
    theory::transpose_note,
};

#[cfg(feature = "rtrb")]
use crate::io::backend::BackendSink;

/// How long a triggered chord counts as "now playing" at speed 1.0.
const HIGHLIGHT_SECONDS: f32 = 1.2;

impl<S: VoiceSink> ChordTrigger for Mutex<SynthesisEngine<S>> {
    fn trigger_chord(&self, symbol: &str, speed: f32) {
        let mut engine = self.lock().unwrap_or_else(PoisonError::into_inner);
        engine.play_symbol(symbol, speed);
    }
}

/// Chord playback front end.
///
/// Owns one synthesis engine and one sequence player that both feed the same
/// voice sink. All methods take `&self` so a `Strumkit` can be shared between
/// threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use strumkit::{EngineConfig, Strumkit};
///
/// let kit = Strumkit::offline(EngineConfig::default());
/// kit.play_chord(0, 7, "7", 1.0); // G7 in C
///
/// let audio = kit.with_engine(|engine| engine.sink_mut().render(0.5));
/// assert!(audio.iter().any(|s| s.abs() > 0.0));
/// ```
pub struct Strumkit<S: VoiceSink + 'static> {
    engine: Arc<Mutex<SynthesisEngine<S>>>,
    sequencer: SequencePlayer<Mutex<SynthesisEngine<S>>>,
}

#[cfg(feature = "rtrb")]
impl Strumkit<BackendSink> {
    /// Play through the default audio output. The device is opened lazily on
    /// the first chord.
    pub fn live(config: EngineConfig) -> Self {
        let sink = BackendSink::new(config.clone());
        Self::new(sink, config)
    }
}

impl Strumkit<OfflineRenderer> {
    /// Render into memory at `config.sample_rate`.
    pub fn offline(config: EngineConfig) -> Self {
        let sink = OfflineRenderer::from_config(&config);
        Self::new(sink, config)
    }
}

impl<S: VoiceSink + 'static> Strumkit<S> {
    pub fn new(sink: S, config: EngineConfig) -> Self {
        let engine = Arc::new(Mutex::new(SynthesisEngine::new(sink, config)));
        let sequencer = SequencePlayer::new(Arc::clone(&engine));
        Self { engine, sequencer }
    }

    /// Play the chord `quality` rooted `offset` semitones above `key_root`.
    pub fn play_chord(&self, key_root: i32, offset: i32, quality: &str, speed: f32) -> usize {
        let symbol = format!("{}{}", transpose_note(key_root, offset), quality);
        self.play_chord_by_name(&symbol, speed)
    }

    /// Play a chord symbol such as `"Dm7"` or `"C/E"`. Returns the number of
    /// voices scheduled.
    pub fn play_chord_by_name(&self, symbol: &str, speed: f32) -> usize {
        debug!(chord = symbol, speed, "play chord");
        self.with_engine(|engine| engine.play_symbol(symbol, speed))
    }

    /// Start playing `playlist`, one chord every `delay_seconds / speed`.
    ///
    /// Ignored while another sequence is playing.
    pub fn start_sequence<I, T>(&self, playlist: I, delay_seconds: f32, speed: f32) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let playlist = playlist.into_iter().map(Into::into).collect();
        self.sequencer.start(playlist, delay_seconds, speed)
    }

    pub fn stop_sequence(&self) {
        self.sequencer.stop();
    }

    pub fn player_state(&self) -> PlayerState {
        self.sequencer.state()
    }

    pub fn sequence_state(&self) -> Option<SequenceState> {
        self.sequencer.sequence_state()
    }

    /// Block until the running sequence finishes or is stopped.
    pub fn wait_for_sequence(&self) -> Option<SequenceOutcome> {
        self.sequencer.wait()
    }

    /// Release every sounding voice.
    pub fn silence(&self) -> bool {
        self.with_engine(|engine| engine.release_all())
    }

    pub fn with_engine<R>(&self, f: impl FnOnce(&mut SynthesisEngine<S>) -> R) -> R {
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }

    /// How long a chord triggered at `speed` stays highlighted.
    pub fn highlight_duration(speed: f32) -> Duration {
        Duration::from_secs_f32(HIGHLIGHT_SECONDS / normalize_speed(speed))
    }
}
