use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    synth::{
        message::{MessageReceiver, SynthMessage},
        voice::{Voice, VoiceState},
    },
    MAX_BLOCK_SIZE,
};

/*
Strum Mixer
===========

The audio-side half of the synthesizer. It owns every sounding voice, sums
them into the output, and keeps the frame clock that the trigger side uses to
schedule new voices.

  trigger thread                         audio thread
  ──────────────                         ────────────
  read clock ──────── FrameClock ←────── publish after each callback
  build voices
  push Start(voice) ── SPSC queue ─────→ drain at top of every block
                                         render + sum voices
                                         drop voices that finished

Voices are created per trigger, so the pool grows with demand. Overlapping
strums simply add more voices. An optional limit caps the pool; when a new
voice arrives at the cap the oldest releasing voice is dropped, or failing
that the oldest voice overall.
*/

/// Voices reserved up front so typical strums never grow the pool on the
/// audio thread.
const INITIAL_VOICE_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct ClockState {
    frames: AtomicU64,
    last_block: AtomicU64,
}

/// Shared view of how many frames the mixer has rendered.
#[derive(Debug, Clone, Default)]
pub struct FrameClock(Arc<ClockState>);

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next frame the mixer will render.
    pub fn now(&self) -> u64 {
        self.0.frames.load(Ordering::Acquire)
    }

    /// Length of the most recent render call, in frames.
    pub fn last_block(&self) -> u64 {
        self.0.last_block.load(Ordering::Acquire)
    }

    fn publish(&self, frames: u64, block: u64) {
        self.0.last_block.store(block, Ordering::Release);
        self.0.frames.store(frames, Ordering::Release);
    }
}

pub struct StrumMixer<R> {
    voices: Vec<Box<Voice>>,
    rx: R,
    voice_limit: Option<usize>,
    clock: FrameClock,
    frame: u64,
    temp_buffer: Vec<f32>,
}

impl<R: MessageReceiver> StrumMixer<R> {
    pub fn new(rx: R, clock: FrameClock) -> Self {
        Self {
            voices: Vec::with_capacity(INITIAL_VOICE_CAPACITY),
            rx,
            voice_limit: None,
            frame: clock.now(),
            clock,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Cap the number of simultaneous voices. `None` is unbounded.
    pub fn with_voice_limit(mut self, limit: Option<usize>) -> Self {
        self.voice_limit = limit.map(|n| n.max(1));
        self
    }

    /// Render any number of frames, in chunks of at most `MAX_BLOCK_SIZE`,
    /// then publish the clock.
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(chunk);
        }
        self.clock.publish(self.frame, out.len() as u64);
    }

    /// Render one block of at most `MAX_BLOCK_SIZE` frames.
    pub fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        while let Some(msg) = self.rx.pop() {
            match msg {
                SynthMessage::Start(voice) => self.admit(voice),
                SynthMessage::AllNotesOff => {
                    for voice in &mut self.voices {
                        voice.release();
                    }
                }
            }
        }

        out.fill(0.0);
        let block_start = self.frame;
        let frames = &mut self.temp_buffer[..out.len()];
        for voice in &mut self.voices {
            voice.render(frames, block_start);
            for (o, v) in out.iter_mut().zip(frames.iter()) {
                *o += v;
            }
        }

        self.voices.retain(|voice| !voice.is_free());
        self.frame += out.len() as u64;
    }

    fn admit(&mut self, voice: Box<Voice>) {
        if voice.is_free() {
            return;
        }
        if let Some(limit) = self.voice_limit {
            while self.voices.len() >= limit {
                match self.steal_candidate() {
                    Some(index) => {
                        self.voices.swap_remove(index);
                    }
                    None => break,
                }
            }
        }
        self.voices.push(voice);
    }

    /// Oldest releasing voice, else the oldest voice of any kind.
    fn steal_candidate(&self) -> Option<usize> {
        let oldest = |releasing_only: bool| {
            self.voices
                .iter()
                .enumerate()
                .filter(|(_, v)| !releasing_only || v.state() == VoiceState::Releasing)
                .min_by_key(|(_, v)| v.start_frame())
                .map(|(index, _)| index)
        };
        oldest(true).or_else(|| oldest(false))
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn sounding_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.rx
    }
}
