//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use spatial_synth::dsp::{FilterType, SVFilter, StereoFilter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let responses = [
        ("lowpass", FilterType::LowPass),
        ("highpass", FilterType::HighPass),
        ("bandpass", FilterType::BandPass),
        ("notch", FilterType::Notch),
    ];

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        for (name, filter_type) in responses {
            let mut filter = SVFilter::new(filter_type, SAMPLE_RATE);
            filter.set_cutoff(1_000.0);
            filter.set_resonance(0.5);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.process_block(black_box(&mut buffer));
                })
            });
        }

        // One voice stage: left and right channels
        let mut stereo = StereoFilter::new(FilterType::LowPass, SAMPLE_RATE);
        stereo.configure(FilterType::LowPass, 2_500.0, 0.3);
        let mut right = input.clone();
        group.bench_with_input(BenchmarkId::new("stereo_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                right.copy_from_slice(&input);
                stereo.process_block(black_box(&mut buffer), black_box(&mut right));
            })
        });
    }

    group.finish();
}
