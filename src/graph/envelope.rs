use crate::{
    dsp::envelope::Envelope,
    graph::node::{GraphNode, RenderCtx},
};

/// Envelope generator as a graph node. Renders the envelope curve itself, so
/// it is normally used as the modulator of `.amplify()`.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn new() -> Self {
        Self {
            env: Envelope::new(),
        }
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: Envelope::adsr(attack, decay, sustain, release),
        }
    }

    pub fn with_release_floor(self, floor: f32) -> Self {
        Self {
            env: self.env.with_release_floor(floor),
        }
    }
}

impl Default for EnvNode {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.env.render(out);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_note_on() {
        let mut node = EnvNode::adsr(0.01, 0.05, 0.5, 0.1);
        assert!(!node.is_active());

        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 0.5);
        let mut buffer = vec![1.0f32; 64];
        node.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|&s| s == 0.0));

        node.note_on(&ctx);
        assert!(node.is_active());
        node.render_block(&mut buffer, &ctx);
        assert!(buffer[63] > 0.0);
        assert_eq!(node.get_envelope_level(), Some(buffer[63]));
    }
}
