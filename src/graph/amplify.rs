use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiply a signal by a modulator, sample by sample. With an envelope as the
/// modulator this is a VCA: the envelope decides both loudness and lifetime.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let gains = &mut self.temp_buffer[..out.len()];
        gains.fill(0.0);
        self.modulator.render_block(gains, ctx);

        for (o, g) in out.iter_mut().zip(gains.iter()) {
            *o *= *g;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator
            .get_envelope_level()
            .or_else(|| self.signal.get_envelope_level())
    }

    /// Silent once the modulator is: a finished envelope gates the signal to
    /// zero no matter what the oscillators are still doing.
    fn is_active(&self) -> bool {
        self.modulator.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn envelope_gates_signal_and_lifetime() {
        let mut node = OscNode::sine().amplify(EnvNode::adsr(0.001, 0.001, 0.5, 0.002));
        let ctx = RenderCtx::from_freq(1_000.0, 100.0, 1.0);
        assert!(!node.is_active());

        node.note_on(&ctx);
        let mut buffer = vec![0.0f32; 16];
        node.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().any(|s| s.abs() > 0.0));

        node.note_off(&ctx);
        node.render_block(&mut buffer, &ctx);
        assert!(!node.is_active());
        assert_eq!(buffer[15], 0.0);
    }
}
