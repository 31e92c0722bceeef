//! Benchmarks for the ADSR and percussive envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use spatial_synth::dsp::{Adsr, DecayEnvelope};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Adsr::adsr(SAMPLE_RATE, 0.1, 0.1, 0.7, 0.3);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut env = Adsr::adsr(SAMPLE_RATE, 0.001, 0.001, 0.7, 0.3);
        env.note_on();
        for _ in 0..200 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Release phase; a long release keeps it from finishing mid-bench
        let mut env = Adsr::adsr(SAMPLE_RATE, 0.001, 0.001, 0.7, 5.0);
        env.note_on();
        for _ in 0..200 {
            env.next_sample();
        }
        env.note_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Percussive: two exponentials per sample
        let mut env = DecayEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.01, 5.0, 0.0, 5.0);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("percussive", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
