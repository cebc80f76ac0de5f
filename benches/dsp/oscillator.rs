//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use strumkit::dsp::oscillator::OscillatorBlock;
use strumkit::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut osc = OscillatorBlock::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Triangle - piecewise linear
        let mut osc = OscillatorBlock::triangle();
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
