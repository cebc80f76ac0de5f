//! Benchmarks for the amplitude envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use strumkit::dsp::envelope::Envelope;
use strumkit::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0, 0.25);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (linear ramp up)
        let mut env = Envelope::adsr(10.0, 0.3, 0.4, 1.5);
        env.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Decay phase (exponential ramp)
        let mut env = Envelope::adsr(0.001, 10.0, 0.4, 1.5);
        env.note_on(&ctx);
        for _ in 0..100 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Release phase (exponential towards the floor)
        let mut env = Envelope::adsr(0.001, 0.001, 0.4, 10.0);
        env.note_on(&ctx);
        for _ in 0..200 {
            env.next_sample();
        }
        env.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
