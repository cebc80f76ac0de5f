use crate::theory::pitch::pitch_to_frequency;

/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch to render (Hz)
/// - velocity: Peak amplitude of the note (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
}

impl RenderCtx {
    /// Create context from an absolute pitch number (C4 = 60)
    pub fn from_note(sample_rate: f32, pitch: i32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency: pitch_to_frequency(pitch),
            velocity,
        }
    }

    /// Create context from a direct frequency
    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes can render audio and respond to musical events
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a note starts
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Triggered when a note is released
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Check if this node is still producing sound
    ///
    /// Used by voice management to know when a voice can be freed. Sources
    /// without an envelope never finish on their own, so the default is true;
    /// a voice graph should end in an envelope that reports idleness.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn get_envelope_level(&self) -> Option<f32> {
        (**self).get_envelope_level()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
