use crate::{
    dsp::{filter::SVFilter, sweep::CutoffSweep},
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Lowpass Filter Node
===================

Wraps the state-variable lowpass for use in a voice graph. In subtractive
synthesis the source carries more harmonics than we want and the filter takes
the harsh top off. Here the source is a triangle, so the job is warmth rather
than drastic shaping.

Parameters:
-----------

Cutoff (Hz): where the rolloff begins.
  - 800 Hz:    muffled, the moment a key is struck
  - 3000 Hz:   open and present
  - 1000 Hz:   warm, where a held chord settles

Q: emphasis at the cutoff. 0.5 is critically damped (no peak at all).

Cutoff Envelope:
----------------

`with_sweep` attaches a `CutoffSweep`. Each block the sweep renders one cutoff
per sample into a scratch buffer, and the filter follows it sample by sample.
note_on restarts the sweep. note_off leaves it alone.

Example usage:
  let warm = OscNode::triangle()
      .through(FilterNode::lowpass(1000.0).with_q(0.5));

  let wah = OscNode::triangle().through(
      FilterNode::lowpass(800.0)
          .with_q(0.5)
          .with_sweep(CutoffSweep::new(800.0, 3000.0, 1000.0, 0.02, 0.3)),
  );
*/

pub struct FilterNode {
    filter: SVFilter,
    sweep: Option<CutoffSweep>,
    cutoffs: Vec<f32>,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        FilterNode {
            filter: SVFilter::lowpass(cutoff_hz),
            sweep: None,
            cutoffs: Vec::new(),
        }
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }

    pub fn with_sweep(mut self, sweep: CutoffSweep) -> Self {
        self.sweep = Some(sweep);
        self.cutoffs = vec![0.0; MAX_BLOCK_SIZE];
        self
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let Some(sweep) = self.sweep.as_mut() else {
            self.filter.render(out, ctx);
            return;
        };

        // Slice scratch buffer to match output size (RT-safe, no allocation)
        let cutoffs = &mut self.cutoffs[..out.len()];
        sweep.render(cutoffs);
        self.filter.render_swept(out, cutoffs, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.filter.reset();
        if let Some(sweep) = self.sweep.as_mut() {
            sweep.trigger(ctx.sample_rate);
            self.filter.set_cutoff(sweep.current());
        }
    }
}
