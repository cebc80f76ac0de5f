use std::collections::VecDeque;

use crate::{
    config::EngineConfig,
    synth::{
        engine::{ClockReading, VoiceSink},
        message::SynthMessage,
        poly::{FrameClock, StrumMixer},
    },
    MAX_BLOCK_SIZE,
};

/// Renders voices into memory instead of a sound card.
///
/// The renderer is its own clock: time only moves when `render*` is called,
/// so a trigger followed by a render is deterministic down to the sample.
pub struct OfflineRenderer {
    mixer: StrumMixer<VecDeque<SynthMessage>>,
    sample_rate: f32,
}

impl OfflineRenderer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mixer: StrumMixer::new(VecDeque::new(), FrameClock::new()),
            sample_rate,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut renderer = Self::new(config.sample_rate);
        renderer.mixer = renderer.mixer.with_voice_limit(config.voice_limit);
        renderer
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.mixer.frame()
    }

    /// Voices still pending or sounding.
    pub fn voice_count(&self) -> usize {
        self.mixer.voice_count()
    }

    /// Voices whose onset has passed and that are still audible.
    pub fn sounding_voices(&self) -> usize {
        self.mixer.sounding_voices()
    }

    /// True when nothing is queued or sounding.
    pub fn is_silent(&mut self) -> bool {
        self.mixer.voice_count() == 0 && self.mixer.receiver_mut().is_empty()
    }

    pub fn render_frames(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.mixer.render(&mut out);
        out
    }

    pub fn render(&mut self, seconds: f32) -> Vec<f32> {
        let frames = (seconds.max(0.0) * self.sample_rate).round() as usize;
        self.render_frames(frames)
    }

    /// Render until every voice has finished, or `max_seconds` have passed.
    pub fn render_until_silent(&mut self, max_seconds: f32) -> Vec<f32> {
        let limit = (max_seconds.max(0.0) * self.sample_rate).round() as usize;
        let mut out = Vec::new();
        let mut block = vec![0.0; MAX_BLOCK_SIZE];

        while out.len() < limit && !self.is_silent() {
            let frames = (limit - out.len()).min(MAX_BLOCK_SIZE);
            self.mixer.render(&mut block[..frames]);
            out.extend_from_slice(&block[..frames]);
        }
        out
    }
}

impl VoiceSink for OfflineRenderer {
    fn clock(&mut self) -> Option<ClockReading> {
        Some(ClockReading {
            sample_rate: self.sample_rate,
            frame: self.mixer.frame(),
        })
    }

    fn submit(&mut self, message: SynthMessage) -> bool {
        self.mixer.receiver_mut().push_back(message);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::engine::SynthesisEngine;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn strum_rings_for_gate_plus_tail() {
        let config = EngineConfig::default().with_sample_rate(8_000.0);
        let mut engine = SynthesisEngine::new(OfflineRenderer::from_config(&config), config);
        assert_eq!(engine.play_symbol("C", 1.0), 3);

        let audio = engine.sink_mut().render_until_silent(10.0);
        let seconds = audio.len() as f32 / 8_000.0;
        // Last string starts at 0.08 s and lasts 1.0 + 1.5 s; rendering stops
        // at the end of the block in which it finished
        let block = MAX_BLOCK_SIZE as f32 / 8_000.0;
        assert!((2.58..2.58 + block).contains(&seconds), "rang for {seconds} s");
        assert!(engine.sink_mut().is_silent());
    }

    #[test]
    fn strings_enter_one_by_one() {
        let config = EngineConfig::default().with_sample_rate(8_000.0);
        let mut engine = SynthesisEngine::new(OfflineRenderer::from_config(&config), config);
        engine.play_symbol("C", 1.0);
        let renderer = engine.sink_mut();

        // 40 ms = 320 frames between strings
        let audio = renderer.render(0.03);
        let bass_only = peak(&audio[100..]);
        assert!(bass_only > 0.0 && bass_only <= 0.5, "bass peak {bass_only}");
        assert_eq!(renderer.sounding_voices(), 1);

        renderer.render(0.02);
        assert_eq!(renderer.sounding_voices(), 2);
        assert_eq!(renderer.voice_count(), 3);

        renderer.render(0.05);
        assert_eq!(renderer.sounding_voices(), 3);
    }

    #[test]
    fn silence_without_triggers() {
        let mut renderer = OfflineRenderer::new(48_000.0);
        assert!(renderer.is_silent());
        assert!(renderer.render_until_silent(1.0).is_empty());
        assert!(renderer.render(0.01).iter().all(|&s| s == 0.0));
        assert_eq!(renderer.frame(), 480);
    }
}
