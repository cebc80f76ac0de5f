use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series: the source renders into the buffer and
the effect then processes that buffer in place.

    [Source] ──→ [Effect] ──→ output

In a keys voice this is the oscillators-into-lowpass step:

    OscNode::triangle()
        .layer(OscNode::sine().with_detune(4.0), 1.0)
        .through(FilterNode::lowpass(800.0).with_q(0.5))

Through vs Amplify vs Mix:
--------------------------
- Through: serial processing (source → effect → output)
- Amplify: multiplication (signal × modulator)
- Mix:     parallel layering (a·ga + b·gb)
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.filter.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.filter.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() && self.filter.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source
            .get_envelope_level()
            .or_else(|| self.filter.get_envelope_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode,
    };

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(48_000.0, 440.0, 1.0)
    }

    #[test]
    fn renders_source_then_filter() {
        let mut node = OscNode::triangle().through(FilterNode::lowpass(500.0).with_q(0.5));
        let mut raw = OscNode::triangle();

        let mut filtered = vec![0.0; 256];
        let mut unfiltered = vec![0.0; 256];
        node.render_block(&mut filtered, &ctx());
        raw.render_block(&mut unfiltered, &ctx());

        assert_ne!(filtered, unfiltered);
        assert!(filtered.iter().all(|&sample| sample.is_finite()));
    }

    #[test]
    fn enveloped_source_ends_the_chain() {
        let mut node = OscNode::sine()
            .amplify(EnvNode::adsr(0.001, 0.001, 0.5, 0.001))
            .through(FilterNode::lowpass(2000.0));
        let ctx = RenderCtx::from_freq(1_000.0, 100.0, 1.0);

        node.note_on(&ctx);
        assert!(node.is_active());
        assert!(node.get_envelope_level().is_some());

        node.note_off(&ctx);
        let mut buffer = vec![0.0; 8];
        node.render_block(&mut buffer, &ctx);
        assert!(!node.is_active(), "filter alone should not keep the chain alive");
    }
}
