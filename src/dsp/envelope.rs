use crate::{dsp::ramp::Ramp, graph::node::RenderCtx, MIN_TIME};

/*
Keys Envelope
=============

An attack/decay/sustain/release generator shaped like a struck electric
piano: a fast linear rise, an exponential fall to a sustain level, and a long
exponential release tail.

Vocabulary
----------

  peak        The level the attack reaches. Taken from `ctx.velocity` at
              note_on, so a louder note has a louder envelope rather than a
              separate gain stage.

  sustain     A RATIO of the peak (0.4 = 40% of peak), not an absolute level.

  release     Time to fall from wherever the envelope is to `release_floor`.

  floor       Exponential curves never reach zero. The release aims at a
              small floor (0.001 = -60 dB) and snaps to silence when it
              arrives.


The Shape
---------

  Level
   peak ┐  ╱╲
        │ ╱  ╲
        │╱    ╲____________
  S*pk  │                  ╲
        │                   ╲___
  floor └────────────────────────‾‾‾──→ Time
         A  D      S           R

    Attack   linear       0      -> peak
    Decay    exponential  peak   -> peak * sustain
    Sustain  hold               (until note_off)
    Release  exponential  level  -> floor, then Idle


The State Machine
-----------------

    Idle ──note_on──→ Attack ──ramp done──→ Decay ──ramp done──→ Sustain
      ↑                  │                    │                     │
      │                  └──────note_off──────┴──────note_off───────┘
      │                                       ↓
      └───────────────ramp done────────── Release

note_off releases from the CURRENT level, so releasing during the attack does
not jump. A level already below the floor releases linearly to zero instead,
because an exponential ramp from there would have to rise.


Implementation Notes
--------------------

Each stage is one `Ramp`. The ramp is rebuilt on every stage transition with
the sample rate seen at that moment, so there is no per-sample division.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Default release target: -60 dB.
pub const RELEASE_FLOOR: f32 = 0.001;

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_ratio: f32,
    release_time: f32,
    release_floor: f32,

    stage: EnvelopeState,
    level: f32,
    peak: f32,
    sample_rate: f32,
    ramp: Ramp,
}

impl Envelope {
    pub fn new() -> Self {
        Self::adsr(0.02, 0.3, 0.4, 1.5)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_ratio: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),
            release_floor: RELEASE_FLOOR,

            stage: EnvelopeState::Idle,
            level: 0.0,
            peak: 1.0,
            sample_rate: 48_000.0,
            ramp: Ramp::hold(0.0),
        }
    }

    pub fn with_release_floor(mut self, floor: f32) -> Self {
        self.release_floor = floor.clamp(f32::EPSILON, 1.0);
        self
    }

    /// Gate high: restart the attack from zero towards `ctx.velocity`.
    pub fn note_on(&mut self, ctx: &RenderCtx) {
        self.sample_rate = ctx.sample_rate;
        self.peak = ctx.velocity.clamp(0.0, 1.0);
        self.level = 0.0;
        self.ramp = Ramp::linear(0.0, self.peak, self.attack_time, self.sample_rate);
        self.stage = EnvelopeState::Attack;
    }

    /// Gate low: release from the current level.
    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.sample_rate = ctx.sample_rate;
        self.ramp = if self.level > self.release_floor {
            Ramp::exponential(
                self.level,
                self.release_floor,
                self.release_time,
                self.sample_rate,
            )
        } else {
            Ramp::linear(self.level, 0.0, self.release_time, self.sample_rate)
        };
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level = self.ramp.next();
                if self.ramp.is_done() {
                    let sustain = self.peak * self.sustain_ratio;
                    self.ramp =
                        Ramp::exponential(self.peak, sustain, self.decay_time, self.sample_rate);
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                self.level = self.ramp.next();
                if self.ramp.is_done() {
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.ramp.value();
            }

            EnvelopeState::Release => {
                self.level = self.ramp.next();
                if self.ramp.is_done() {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.ramp = Ramp::hold(0.0);
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn ctx(peak: f32) -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, 440.0, peak)
    }

    fn render_samples(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn attack_reaches_velocity_peak() {
        let mut env = Envelope::adsr(0.02, 0.3, 0.4, 1.5);
        env.note_on(&ctx(0.25));
        render_samples(&mut env, 20);

        assert!((env.level() - 0.25).abs() < 1e-6);
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn decay_settles_on_sustain_ratio() {
        let mut env = Envelope::adsr(0.02, 0.3, 0.4, 1.5);
        env.note_on(&ctx(0.25));
        render_samples(&mut env, 20 + 300);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - 0.1).abs() < 1e-6);

        render_samples(&mut env, 500);
        assert!((env.level() - 0.1).abs() < 1e-6, "sustain should hold");
    }

    #[test]
    fn decay_is_exponential() {
        let mut env = Envelope::adsr(0.02, 0.3, 0.4, 1.5);
        env.note_on(&ctx(1.0));
        render_samples(&mut env, 20 + 150);

        // Halfway through an exponential fall sits at the geometric mean
        let expected = 0.4f32.sqrt();
        assert!((env.level() - expected).abs() < 0.01, "level {}", env.level());
    }

    #[test]
    fn release_falls_to_idle() {
        let mut env = Envelope::adsr(0.02, 0.3, 0.4, 1.5);
        env.note_on(&ctx(0.15));
        render_samples(&mut env, 1_000);

        env.note_off(&ctx(0.15));
        assert_eq!(env.state(), EnvelopeState::Release);
        render_samples(&mut env, 1_499);
        assert!(env.is_active());
        assert!(env.level() <= 0.0011);

        render_samples(&mut env, 1);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn release_during_attack_starts_from_current_level() {
        let mut env = Envelope::adsr(0.02, 0.3, 0.4, 0.1);
        env.note_on(&ctx(1.0));
        render_samples(&mut env, 10);
        let before = env.level();

        env.note_off(&ctx(1.0));
        let first = env.next_sample();
        assert!(first < before && first > before * 0.8);
    }

    #[test]
    fn note_off_when_idle_is_ignored() {
        let mut env = Envelope::new();
        env.note_off(&ctx(1.0));
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert!(!env.is_active());
    }
}
