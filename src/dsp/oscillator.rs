use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase Accumulator
=================

Both waveforms are functions of a normalized phase in [0, 1):

    phase += frequency / sample_rate      (wrapped back into [0, 1))

The phase is kept in f64. At 48 kHz an f32 accumulator drifts audibly within
seconds on low notes; f64 does not within any realistic note length.

    sine       sin(2π · phase)

    triangle        ╱╲
                   ╱  ╲        4p         p < 0.25
              ────╱────╲────   2 - 4p     p < 0.75
                        ╲  ╱   4p - 4     otherwise
                         ╲╱

Both start at zero and rise, so the two layers of a voice begin in phase and
a note onset never clicks.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Triangle,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f64,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    #[inline]
    fn sample_at(&self, phase: f64) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin() as f32,
            OscillatorWaveform::Triangle => {
                let value = if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                };
                value as f32
            }
        }
    }

    /// Fill `destination` with the waveform at `ctx.frequency`.
    pub fn render(&mut self, destination: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency as f64 / ctx.sample_rate as f64;

        for sample in destination.iter_mut() {
            *sample = self.sample_at(self.phase);
            self.phase = (self.phase + increment).rem_euclid(1.0);
        }
    }

    /// Rewind to phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }
}
