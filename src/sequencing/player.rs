use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::synth::engine::normalize_speed;

/*
Sequence Player
===============

Plays a list of chord symbols one after another on a worker thread:

    for each chord:
        cancelled?  -> stop
        trigger chord
        sleep base_delay / speed

    Idle ──start(non-empty)──→ Playing ──list exhausted──→ Idle
                                  │
                                  └──────stop()──────────→ Idle

stop() only raises the cancellation token. The worker is not interrupted: a
delay that has begun always runs to its end, then the token is checked at the
top of the loop and the worker exits. Voices already triggered are not touched
and ring out their release tails.

Only one sequence runs at a time: start() while Playing is refused.
*/

/// Something that can sound a chord by its symbol.
pub trait ChordTrigger: Send + Sync {
    fn trigger_chord(&self, symbol: &str, speed: f32);
}

impl<F> ChordTrigger for F
where
    F: Fn(&str, f32) + Send + Sync,
{
    fn trigger_chord(&self, symbol: &str, speed: f32) {
        self(symbol, speed)
    }
}

/// Shared stop flag for one sequence run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
}

/// Snapshot of a running (or just finished) sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceState {
    pub playlist: Vec<String>,
    /// Index of the chord most recently triggered.
    pub current_index: usize,
    pub cancelled: bool,
}

/// How a sequence run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceOutcome {
    pub played: usize,
    pub cancelled: bool,
}

/// Time between chord triggers: `base_delay / speed` seconds.
pub fn inter_chord_delay(base_delay: f32, speed: f32) -> Duration {
    let base = if base_delay.is_finite() {
        base_delay.max(0.0)
    } else {
        0.0
    };
    Duration::from_secs_f32(base / normalize_speed(speed))
}

/// Run a sequence to completion on the current thread.
pub fn run_sequence<T: ChordTrigger + ?Sized>(
    trigger: &T,
    playlist: &[String],
    delay: Duration,
    speed: f32,
    token: &CancellationToken,
    progress: &AtomicUsize,
) -> SequenceOutcome {
    let mut played = 0;

    for (index, symbol) in playlist.iter().enumerate() {
        if token.is_cancelled() {
            debug!(played, "sequence cancelled");
            return SequenceOutcome {
                played,
                cancelled: true,
            };
        }

        progress.store(index, Ordering::Release);
        debug!(index, chord = %symbol, "sequence step");
        trigger.trigger_chord(symbol, speed);
        played += 1;

        // Not interruptible; cancellation is seen on the next iteration
        thread::sleep(delay);
    }

    SequenceOutcome {
        played,
        cancelled: token.is_cancelled(),
    }
}

struct Run {
    token: CancellationToken,
    playlist: Vec<String>,
    progress: Arc<AtomicUsize>,
    handle: JoinHandle<SequenceOutcome>,
}

impl Run {
    fn is_playing(&self) -> bool {
        !self.handle.is_finished()
    }
}

pub struct SequencePlayer<T: ?Sized> {
    trigger: Arc<T>,
    run: Mutex<Option<Run>>,
}

impl<T: ChordTrigger + ?Sized + 'static> SequencePlayer<T> {
    pub fn new(trigger: Arc<T>) -> Self {
        Self {
            trigger,
            run: Mutex::new(None),
        }
    }

    /// Start playing `playlist`. Returns false if a sequence is already
    /// playing or the playlist is empty.
    pub fn start(&self, playlist: Vec<String>, base_delay: f32, speed: f32) -> bool {
        let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        if run.as_ref().is_some_and(Run::is_playing) {
            debug!("sequence already playing");
            return false;
        }
        if playlist.is_empty() {
            return false;
        }

        let token = CancellationToken::new();
        let progress = Arc::new(AtomicUsize::new(0));
        let delay = inter_chord_delay(base_delay, speed);

        let worker = {
            let trigger = Arc::clone(&self.trigger);
            let token = token.clone();
            let progress = Arc::clone(&progress);
            let playlist = playlist.clone();
            move || run_sequence(&*trigger, &playlist, delay, speed, &token, &progress)
        };

        match thread::Builder::new()
            .name("strumkit-sequence".into())
            .spawn(worker)
        {
            Ok(handle) => {
                info!(chords = playlist.len(), ?delay, "sequence started");
                *run = Some(Run {
                    token,
                    playlist,
                    progress,
                    handle,
                });
                true
            }
            Err(err) => {
                warn!(%err, "failed to spawn sequence thread");
                false
            }
        }
    }

    /// Cancel the running sequence, if any. Does not wait for the worker.
    pub fn stop(&self) {
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(run) = run.as_ref() {
            run.token.cancel();
        }
    }

    pub fn state(&self) -> PlayerState {
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        match run.as_ref() {
            Some(run) if run.is_playing() => PlayerState::Playing,
            _ => PlayerState::Idle,
        }
    }

    /// Snapshot of the current or last run.
    pub fn sequence_state(&self) -> Option<SequenceState> {
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        run.as_ref().map(|run| SequenceState {
            playlist: run.playlist.clone(),
            current_index: run.progress.load(Ordering::Acquire),
            cancelled: run.token.is_cancelled(),
        })
    }

    /// Block until the current run ends and return how it ended.
    pub fn wait(&self) -> Option<SequenceOutcome> {
        let taken = self
            .run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let run = taken?;
        match run.handle.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                warn!("sequence thread panicked");
                None
            }
        }
    }
}
