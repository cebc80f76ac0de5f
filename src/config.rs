#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{synth::engine::normalize_speed, voices::KeysPatch};

/// Playback settings shared by the live and offline engines.
///
/// Defaults reproduce the strummed keys sound: strings 40 ms apart, a louder
/// bass string, every string held for one second before its release tail.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Rate used for offline rendering and when the device reports none.
    pub sample_rate: f32,
    /// Capacity of the trigger -> audio message queue.
    pub queue_capacity: usize,
    /// Maximum simultaneous voices. `None` lets overlapping strums pile up.
    pub voice_limit: Option<usize>,
    /// Seconds between successive strings at speed 1.0.
    pub strum_spacing: f32,
    /// Seconds each string is held before it starts to release.
    pub note_duration: f32,
    pub bass_volume: f32,
    pub upper_volume: f32,
    pub patch: KeysPatch,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            queue_capacity: 1024,
            voice_limit: None,
            strum_spacing: 0.04,
            note_duration: 1.0,
            bass_volume: 0.25,
            upper_volume: 0.15,
            patch: KeysPatch::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_voice_limit(mut self, limit: Option<usize>) -> Self {
        self.voice_limit = limit;
        self
    }

    pub fn with_strum_spacing(mut self, seconds: f32) -> Self {
        self.strum_spacing = seconds.max(0.0);
        self
    }

    pub fn with_note_duration(mut self, seconds: f32) -> Self {
        self.note_duration = seconds.max(0.0);
        self
    }

    pub fn with_volumes(mut self, bass: f32, upper: f32) -> Self {
        self.bass_volume = bass.clamp(0.0, 1.0);
        self.upper_volume = upper.clamp(0.0, 1.0);
        self
    }

    pub fn with_patch(mut self, patch: KeysPatch) -> Self {
        self.patch = patch;
        self
    }

    /// Peak level of string `index`; the bass string is louder.
    pub fn volume_for(&self, index: usize) -> f32 {
        if index == 0 {
            self.bass_volume
        } else {
            self.upper_volume
        }
    }

    /// Seconds from the first string's onset until the last string is silent.
    pub fn ring_time(&self, strings: usize, speed: f32) -> f32 {
        let spacing = self.strum_spacing / normalize_speed(speed);
        let last_onset = strings.saturating_sub(1) as f32 * spacing;
        last_onset + self.note_duration + self.patch.tail()
    }
}
