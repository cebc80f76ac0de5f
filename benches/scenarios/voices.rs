//! Benchmarks for complete voice chains.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use strumkit::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::FilterNode,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
};
use strumkit::voices::{self, KeysPatch};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::from_freq(48_000.0, 130.81, 0.25); // C3, the bass string

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === BASELINE ===
        // single triangle → fixed lowpass → envelope
        let mut plain = OscNode::triangle()
            .through(FilterNode::lowpass(2000.0))
            .amplify(EnvNode::new());
        plain.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new("triangle_lowpass", size), &size, |b, _| {
            b.iter(|| {
                plain.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // === KEYS ===
        // detuned layer → swept lowpass → envelope, as strummed
        let mut keys = voices::keys();
        keys.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("voices::keys", size), &size, |b, _| {
            b.iter(|| {
                keys.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Same patch with a long release, rendered in its tail
        let mut released = voices::keys_with(&KeysPatch {
            release: 30.0,
            ..KeysPatch::default()
        });
        released.note_on(&ctx);
        released.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("keys_release", size), &size, |b, _| {
            b.iter(|| {
                released.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
