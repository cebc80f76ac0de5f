use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Layering
=================

Mix sums two sources with independent gains:

    output = (A × gain_a) + (B × gain_b)

Unlike a crossfade the gains do not have to add up to 1. Layering a full
triangle with a full sine (1.0 + 1.0) is exactly what an electric-piano voice
wants: both layers at full strength, the filter and envelope downstream take
care of the level.

How it works:
1. Render source A into the output buffer
2. Render source B into a temporary buffer
3. Weighted sum, in place

Both sources receive note_on/note_off events. Put the envelope AFTER the mix
so it gates both layers:

  a.layer(b, 1.0).amplify(env)   // envelope gates both
  a.amplify(env).layer(b, 1.0)   // b drones forever
*/

pub struct Mix<A, B> {
    pub source_a: A,
    pub source_b: B,
    pub gain_a: f32,
    pub gain_b: f32,
    temp_buffer: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, gain_a: f32, gain_b: f32) -> Self {
        Mix {
            source_a,
            source_b,
            gain_a,
            gain_b,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<S: GraphNode, M: GraphNode> GraphNode for Mix<S, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source_a.render_block(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.source_b.render_block(frames, ctx);

        for (o, b) in out.iter_mut().zip(frames.iter()) {
            *o = (*o * self.gain_a) + (*b * self.gain_b);
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source_a.note_on(ctx);
        self.source_b.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source_a.note_off(ctx);
        self.source_b.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        match (
            self.source_a.get_envelope_level(),
            self.source_b.get_envelope_level(),
        ) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, oscillator::OscNode};

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(48_000.0, 440.0, 1.0)
    }

    #[test]
    fn layering_identical_sources_doubles() {
        let mut single = OscNode::sine();
        let mut layered = OscNode::sine().layer(OscNode::sine(), 1.0);

        let mut a = vec![0.0f32; 256];
        let mut b = vec![0.0f32; 256];
        single.render_block(&mut a, &ctx());
        layered.render_block(&mut b, &ctx());

        for (x, y) in a.iter().zip(&b) {
            assert!((y - 2.0 * x).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_gain_mutes_a_layer() {
        let mut single = OscNode::triangle();
        let mut layered = OscNode::triangle().layer(OscNode::sine(), 0.0);

        let mut a = vec![0.0f32; 128];
        let mut b = vec![0.0f32; 128];
        single.render_block(&mut a, &ctx());
        layered.render_block(&mut b, &ctx());
        assert_eq!(a, b);
    }

    #[test]
    fn output_stays_bounded_for_all_block_sizes() {
        for size in [64, 128, 256, 512, 1024] {
            let mut layered = OscNode::triangle().layer(OscNode::sine().with_detune(4.0), 1.0);
            let mut buffer = vec![0.0f32; size];
            layered.render_block(&mut buffer, &ctx());

            assert!(buffer.iter().all(|s| s.is_finite() && s.abs() <= 2.0));
        }
    }
}
