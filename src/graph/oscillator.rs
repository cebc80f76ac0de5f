use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

The sound source of a voice. It follows the note pitch in `ctx.frequency`,
optionally offset by a fixed detune.

Waveforms
---------

Sine: a single frequency with no harmonics.
  - Sound: smooth, round, the "sub" weight under a keys patch

Triangle: odd harmonics only, falling off as 1/n².
  - Sound: soft, hollow, between sine and square
  - Use: the body of an electric-piano style voice

Detune
------

Detune is given in cents (100 cents = 1 semitone) and applied as

    frequency · 2^(cents / 1200)

Two layers a few cents apart beat slowly against each other. At A3 (220 Hz)
+4 cents is 0.51 Hz, a gentle chorus shimmer rather than an out-of-tune note.

Example usage:
  let body = OscNode::triangle();
  let sub  = OscNode::sine().with_detune(4.0);
  let keys = body.layer(sub, 1.0);
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Detune in cents. 100 cents = 1 semitone.
    detune_cents: f32,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            detune_cents: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    /// Set detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn detune_cents(&self) -> f32 {
        self.detune_cents
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frequency = if self.detune_cents != 0.0 {
            ctx.frequency * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            ctx.frequency
        };

        let detuned = RenderCtx { frequency, ..*ctx };
        self.osc.render(out, &detuned);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
    }
}
