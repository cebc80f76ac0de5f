//! Keys voice - a warm, struck electric-piano tone for strummed chords.
//!
//! # How It Works
//!
//! 1. A triangle gives the body, a sine 4 cents sharp adds weight and a slow
//!    chorus beat against it
//! 2. Both layers go through a critically damped lowpass (Q 0.5) that takes
//!    the digital edge off
//! 3. The lowpass cutoff opens 800 Hz -> 3000 Hz during the attack and closes
//!    to 1000 Hz over the decay: the "wah" of a struck tine
//! 4. The amplitude envelope rises in 20 ms, falls to 40% of the peak over
//!    300 ms, holds, then fades out over 1.5 s after release
//!
//! The peak level is the note velocity, so the same patch plays a loud bass
//! string and softer upper strings.
//!
//! # Variations
//!
//! - More detune (8-12 cents) = wobblier, more chorused
//! - Higher settle cutoff = brighter sustain
//! - Shorter release = damped, staccato strums

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::sweep::CutoffSweep,
    graph::{
        envelope::EnvNode, extensions::NodeExt, filter::FilterNode, node::GraphNode,
        oscillator::OscNode,
    },
};

/// Sound-design parameters of the keys voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeysPatch {
    /// Detune of the sine layer in cents.
    pub detune_cents: f32,
    /// Gain of the sine layer relative to the triangle.
    pub sub_level: f32,
    pub filter_q: f32,

    pub attack: f32,
    pub decay: f32,
    /// Sustain level as a ratio of the peak.
    pub sustain: f32,
    pub release: f32,
    pub release_floor: f32,

    pub cutoff_start: f32,
    pub cutoff_peak: f32,
    pub cutoff_settle: f32,
}

impl Default for KeysPatch {
    fn default() -> Self {
        Self {
            detune_cents: 4.0,
            sub_level: 1.0,
            filter_q: 0.5,

            attack: 0.02,
            decay: 0.3,
            sustain: 0.4,
            release: 1.5,
            release_floor: 0.001,

            cutoff_start: 800.0,
            cutoff_peak: 3000.0,
            cutoff_settle: 1000.0,
        }
    }
}

impl KeysPatch {
    /// Seconds a voice keeps sounding after its gate closes.
    pub fn tail(&self) -> f32 {
        self.release
    }
}

/// Create the default keys voice.
pub fn keys() -> impl GraphNode {
    keys_with(&KeysPatch::default())
}

/// Create a keys voice from `patch`.
pub fn keys_with(patch: &KeysPatch) -> impl GraphNode {
    let sweep = CutoffSweep::new(
        patch.cutoff_start,
        patch.cutoff_peak,
        patch.cutoff_settle,
        patch.attack,
        patch.decay,
    );

    OscNode::triangle()
        .layer(OscNode::sine().with_detune(patch.detune_cents), patch.sub_level)
        .through(
            FilterNode::lowpass(patch.cutoff_start)
                .with_q(patch.filter_q)
                .with_sweep(sweep),
        )
        .amplify(
            EnvNode::adsr(patch.attack, patch.decay, patch.sustain, patch.release)
                .with_release_floor(patch.release_floor),
        )
}
