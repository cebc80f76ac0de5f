use tracing::{debug, warn};

use crate::{
    config::EngineConfig,
    synth::{
        factory::{boxed, BoxedFactory},
        message::SynthMessage,
        voice::Voice,
    },
    theory::{
        chord::Chord,
        pitch::{pitch_to_frequency, PitchClass},
        voicing::{voice_notes, VoicedPitch},
    },
    voices::keys_with,
};

/*
Synthesis Engine (control side)
===============================

Turns a voiced chord into scheduled voices and hands them to the audio side.
Nothing here blocks: reading the clock is an atomic load and submitting a
voice is a push into a lock-free queue.

Strum Timing
------------

    onset(i)  = i · strum_spacing / speed        bass string first
    peak(i)   = bass_volume  if i == 0
                upper_volume otherwise
    gate(i)   = note_duration

With the defaults a four-note chord at speed 1.0 starts its strings at 0, 40,
80 and 120 ms. Every voice then rings for `note_duration` plus the patch's
release tail, independent of anything triggered before or after it.

Sinks
-----

Where the voices go is abstracted behind `VoiceSink`: the live backend pushes
into the audio callback's queue, the offline renderer into its own mixer.
A sink that cannot produce a clock (no audio device) turns the trigger into a
silent no-op.
*/

/// One note of a strum, fully resolved for synthesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoicedNote {
    pub pitch_class: PitchClass,
    pub octave: i32,
    pub frequency: f32,
    /// Seconds after the trigger instant.
    pub onset: f32,
    /// Gate length in seconds.
    pub duration: f32,
    pub peak: f32,
}

/// The audio side's clock as seen from the trigger side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    pub sample_rate: f32,
    /// Earliest frame a voice submitted now can start on.
    pub frame: u64,
}

/// Destination for scheduled voices.
pub trait VoiceSink: Send {
    /// Current clock, or `None` when audio output is unavailable.
    fn clock(&mut self) -> Option<ClockReading>;

    /// Queue a message for the mixer. Returns false if it was not accepted.
    fn submit(&mut self, message: SynthMessage) -> bool;
}

impl<S: VoiceSink + ?Sized> VoiceSink for Box<S> {
    fn clock(&mut self) -> Option<ClockReading> {
        (**self).clock()
    }

    fn submit(&mut self, message: SynthMessage) -> bool {
        (**self).submit(message)
    }
}

/// Replace a speed that would break the strum math with 1.0.
pub fn normalize_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        debug!(speed, "invalid playback speed, using 1.0");
        1.0
    }
}

pub struct SynthesisEngine<S> {
    sink: S,
    factory: BoxedFactory,
    config: EngineConfig,
}

impl<S: VoiceSink> SynthesisEngine<S> {
    /// Engine playing the keys patch from `config`.
    pub fn new(sink: S, config: EngineConfig) -> Self {
        let patch = config.patch;
        Self::with_factory(sink, config, boxed(move || keys_with(&patch)))
    }

    pub fn with_factory(sink: S, config: EngineConfig, factory: BoxedFactory) -> Self {
        Self {
            sink,
            factory,
            config,
        }
    }

    /// Strum plan for an already voiced chord.
    pub fn plan(&self, voiced: &[VoicedPitch], speed: f32) -> Vec<VoicedNote> {
        let speed = normalize_speed(speed);
        let spacing = self.config.strum_spacing / speed;

        voiced
            .iter()
            .enumerate()
            .map(|(index, pitch)| VoicedNote {
                pitch_class: pitch.name.pitch_class(),
                octave: pitch.octave,
                frequency: pitch_to_frequency(pitch.pitch),
                onset: index as f32 * spacing,
                duration: self.config.note_duration,
                peak: self.config.volume_for(index),
            })
            .collect()
    }

    /// Schedule `notes` relative to now. Returns how many voices were queued.
    pub fn trigger(&mut self, notes: &[VoicedNote]) -> usize {
        if notes.is_empty() {
            return 0;
        }

        let Some(clock) = self.sink.clock() else {
            debug!(notes = notes.len(), "no audio output, trigger dropped");
            return 0;
        };

        let mut queued = 0;
        for note in notes {
            if !note.frequency.is_finite() || note.frequency <= 0.0 {
                debug!(frequency = note.frequency, "skipping unplayable note");
                continue;
            }

            let offset = (note.onset.max(0.0) * clock.sample_rate).round() as u64;
            let voice = Voice::new(self.factory.create_voice(), clock.sample_rate).scheduled(
                clock.frame + offset,
                note.frequency,
                note.peak,
                note.duration,
            );

            if !self.sink.submit(SynthMessage::Start(Box::new(voice))) {
                warn!(queued, "voice queue full, dropping rest of strum");
                break;
            }
            queued += 1;
        }

        debug!(queued, frame = clock.frame, "strum scheduled");
        queued
    }

    /// Plan and trigger a voiced chord.
    pub fn play(&mut self, voiced: &[VoicedPitch], speed: f32) -> usize {
        let notes = self.plan(voiced, speed);
        self.trigger(&notes)
    }

    /// Parse, voice and strum a chord symbol such as `"Am7/G"`.
    ///
    /// An unparseable symbol plays nothing; an unknown quality plays a major
    /// triad.
    pub fn play_symbol(&mut self, symbol: &str, speed: f32) -> usize {
        match Chord::parse(symbol) {
            Ok(chord) => {
                let voiced = voice_notes(&chord.notes(), chord.bass_note());
                self.play(&voiced, speed)
            }
            Err(err) => {
                debug!(%err, "chord not playable");
                0
            }
        }
    }

    /// Close the gate on everything that is sounding.
    pub fn release_all(&mut self) -> bool {
        self.sink.submit(SynthMessage::AllNotesOff)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
