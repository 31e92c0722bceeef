//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use spatial_synth::dsp::{Detune, Oscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let waveforms = [
        ("sine", Waveform::Sine),
        ("sawtooth", Waveform::Sawtooth),
        ("square", Waveform::Square),
        ("triangle", Waveform::Triangle),
        ("noise", Waveform::Noise),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in waveforms {
            let mut osc = Oscillator::new(SAMPLE_RATE, 1);
            osc.set_waveform(waveform);
            osc.start(440.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.render(black_box(&mut buffer)))
            });
        }

        // Cents detune goes through powf once per retune, not per sample
        let mut osc = Oscillator::new(SAMPLE_RATE, 1);
        osc.set_waveform(Waveform::Sawtooth);
        osc.set_detune(Detune::Cents(7.0));
        osc.start(440.0);
        group.bench_with_input(BenchmarkId::new("sawtooth_detuned", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
