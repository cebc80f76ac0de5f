use crate::graph::node::{GraphNode, RenderCtx};

/*
Scheduled Voice
===============

A voice is one sounding string of a strum: a graph plus the moment it starts
and the moment its gate closes, both measured on the mixer's frame clock.

    frame:   ... start_frame ───────── gate ───────────── tail done
    state:   Pending │ Active          │ Releasing        │ Free
                     note_on           note_off           graph idle

Rendering is sample accurate. A block that contains the start frame renders
silence up to it and the graph after it; a block that contains the gate frame
splits there and sends note_off in between. A voice whose start frame is
already in the past when it is first rendered starts at the top of the block.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Pending,   // Scheduled, start frame not reached yet
    Active,    // Gate open: attack, decay or sustain
    Releasing, // Gate closed, envelope ringing out
    Free,      // Finished, can be dropped
}

/// A single voice that can play any GraphNode
pub struct Voice<T: GraphNode = Box<dyn GraphNode>> {
    graph: T,
    state: VoiceState,
    ctx: RenderCtx,
    start_frame: u64,
    gate_frames: u64,
    elapsed: u64,
}

impl<T: GraphNode> Voice<T> {
    pub fn new(graph: T, sample_rate: f32) -> Self {
        Self {
            graph,
            state: VoiceState::Free,
            ctx: RenderCtx::from_freq(sample_rate, 0.0, 0.0),
            start_frame: 0,
            gate_frames: 0,
            elapsed: 0,
        }
    }

    /// Arm the voice: start at `start_frame`, hold the gate for `gate_seconds`.
    pub fn schedule(&mut self, start_frame: u64, frequency: f32, peak: f32, gate_seconds: f32) {
        self.ctx = RenderCtx::from_freq(self.ctx.sample_rate, frequency, peak);
        self.start_frame = start_frame;
        self.gate_frames = (gate_seconds.max(0.0) * self.ctx.sample_rate).round() as u64;
        self.elapsed = 0;
        self.state = VoiceState::Pending;
    }

    /// Builder form of [`Voice::schedule`].
    pub fn scheduled(
        mut self,
        start_frame: u64,
        frequency: f32,
        peak: f32,
        gate_seconds: f32,
    ) -> Self {
        self.schedule(start_frame, frequency, peak, gate_seconds);
        self
    }

    /// Render this voice's contribution for the block beginning at
    /// `block_start`. `out` is overwritten.
    pub fn render(&mut self, out: &mut [f32], block_start: u64) {
        out.fill(0.0);
        let block_end = block_start + out.len() as u64;

        let mut offset = 0usize;
        if self.state == VoiceState::Pending {
            if self.start_frame >= block_end {
                return;
            }
            offset = self.start_frame.saturating_sub(block_start) as usize;
            self.graph.note_on(&self.ctx);
            self.state = VoiceState::Active;
        }

        while offset < out.len() {
            match self.state {
                VoiceState::Active => {
                    let until_gate = self.gate_frames.saturating_sub(self.elapsed);
                    if until_gate == 0 {
                        self.graph.note_off(&self.ctx);
                        self.state = VoiceState::Releasing;
                        continue;
                    }

                    let frames = (out.len() - offset).min(until_gate as usize);
                    self.graph
                        .render_block(&mut out[offset..offset + frames], &self.ctx);
                    offset += frames;
                    self.elapsed += frames as u64;
                }
                VoiceState::Releasing => {
                    let frames = out.len() - offset;
                    self.graph.render_block(&mut out[offset..], &self.ctx);
                    self.elapsed += frames as u64;
                    offset = out.len();

                    if !self.graph.is_active() {
                        self.free();
                    }
                }
                VoiceState::Pending | VoiceState::Free => break,
            }
        }
    }

    /// Close the gate now. A voice that has not started yet is discarded.
    pub fn release(&mut self) {
        match self.state {
            VoiceState::Active => {
                self.state = VoiceState::Releasing;
                self.graph.note_off(&self.ctx);
            }
            VoiceState::Pending => self.free(),
            VoiceState::Releasing | VoiceState::Free => {}
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn get_envelope_level(&self) -> Option<f32> {
        self.graph.get_envelope_level()
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
    }

    pub fn frequency(&self) -> f32 {
        self.ctx.frequency
    }

    pub fn peak(&self) -> f32 {
        self.ctx.velocity
    }

    /// Frame the voice starts on; doubles as its age for stealing.
    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn gate_frames(&self) -> u64 {
        self.gate_frames
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    const SR: f32 = 1_000.0;

    fn gated_dc() -> Voice<impl GraphNode> {
        // Envelope alone renders its own curve: an easy signal to inspect
        Voice::new(EnvNode::adsr(0.001, 0.001, 1.0, 0.002), SR)
    }

    #[test]
    fn pending_voice_waits_for_start_frame() {
        let mut voice = gated_dc().scheduled(100, 440.0, 0.5, 0.05);
        let mut out = vec![1.0f32; 64];

        voice.render(&mut out, 0);
        assert_eq!(voice.state(), VoiceState::Pending);
        assert!(out.iter().all(|&s| s == 0.0));

        voice.render(&mut out, 64);
        assert_eq!(voice.state(), VoiceState::Active);
        // 100 - 64 = 36 frames of silence before the onset
        assert!(out[..36].iter().all(|&s| s == 0.0));
        assert!(out[36] > 0.0);
    }

    #[test]
    fn gate_splits_block_and_voice_frees() {
        let mut voice = gated_dc().scheduled(0, 440.0, 0.5, 0.01);
        let mut out = vec![0.0f32; 32];

        voice.render(&mut out, 0);
        // Gate closes after 10 frames, release lasts 2
        assert_eq!(out[9], 0.5);
        assert!(out[10] < 0.5 && out[10] > 0.0);
        assert_eq!(out[12], 0.0);
        assert!(voice.is_free());
    }

    #[test]
    fn late_voice_starts_at_block_top() {
        let mut voice = gated_dc().scheduled(10, 440.0, 0.5, 1.0);
        let mut out = vec![0.0f32; 16];
        voice.render(&mut out, 100);
        assert!(out[0] > 0.0);
        assert!(voice.is_active());
    }

    #[test]
    fn release_discards_pending_and_gates_active() {
        let mut pending = gated_dc().scheduled(1_000, 440.0, 0.5, 1.0);
        pending.release();
        assert!(pending.is_free());

        let mut voice = Voice::new(
            OscNode::sine().amplify(EnvNode::adsr(0.001, 0.001, 1.0, 0.002)),
            SR,
        )
        .scheduled(0, 100.0, 1.0, 10.0);
        let mut out = vec![0.0f32; 8];
        voice.render(&mut out, 0);
        voice.release();
        assert_eq!(voice.state(), VoiceState::Releasing);

        voice.render(&mut out, 8);
        assert!(voice.is_free());
    }

    #[test]
    fn boxed_graph_is_the_default() {
        let graph: Box<dyn GraphNode> = Box::new(EnvNode::new());
        let voice: Voice = Voice::new(graph, 48_000.0).scheduled(0, 220.0, 0.25, 1.0);
        assert_eq!(voice.gate_frames(), 48_000);
        assert_eq!(voice.peak(), 0.25);
        assert_eq!(voice.frequency(), 220.0);
    }
}
