use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/*
Overlap-Add FFT Convolution
===========================

Convolves a mono stream with a short impulse response (up to
MAX_RESPONSE_LEN taps) without adding latency.

Each call is split into partitions of at most PARTITION samples. A partition
of n samples is zero-padded to fft_size, transformed, multiplied by the
response spectrum and transformed back. The result is n + taps - 1 samples
long:

    result:  [ n samples → output ][ taps - 1 samples → tail ]

The first n samples (plus whatever the tail already held) are the output.
The rest is shifted into the tail and added to the next partition.

    fft_size = next_power_of_two(PARTITION + taps - 1)

guarantees the circular convolution never wraps, so any partition length up
to PARTITION produces the exact linear convolution. Callers can therefore
pass blocks of any length.

Cross-fading
------------

Two spectrum/tail slots exist. `load` writes the new response into the idle
slot, seeds its tail with the active slot's tail (so the old response's
ringing carries over) and then runs both for CROSSFADE_SAMPLES, blending
linearly from old to new. Afterwards the new slot becomes active.

A load that arrives while a fade is still running is queued in a
preallocated buffer and starts its own fade at the first partition after the
current one completes. Only the newest queued response is kept.

All buffers are allocated in `new`; `load` and `process` never allocate.
*/

/// Largest block convolved in one FFT pass.
pub const PARTITION: usize = 128;
/// Length of the linear blend after a response change.
pub const CROSSFADE_SAMPLES: usize = 256;
/// Longest impulse response a convolver accepts.
pub const MAX_RESPONSE_LEN: usize = 512;

pub struct Convolver {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    fft_size: usize,
    response_len: usize,

    spectra: [Vec<Complex<f32>>; 2],
    tails: [Vec<f32>; 2],
    active: usize,
    fade_remaining: usize,
    queued: Vec<f32>,
    queued_len: Option<usize>,

    input_spectrum: Vec<Complex<f32>>,
    work: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    fade_buffer: Vec<f32>,
}

impl Convolver {
    /// Build a convolver for responses of up to `response_len` taps.
    ///
    /// FFT plans come from `planner`, which caches them, so every convolver
    /// built from the same planner shares one pair of plans.
    pub fn new(response_len: usize, planner: &mut FftPlanner<f32>) -> Self {
        let response_len = response_len.clamp(1, MAX_RESPONSE_LEN);
        let fft_size = (PARTITION + response_len - 1).next_power_of_two();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        // Spectrum of a unit impulse is flat
        let unit = vec![Complex::new(1.0, 0.0); fft_size];

        Self {
            forward,
            inverse,
            fft_size,
            response_len,
            spectra: [unit.clone(), unit],
            tails: [vec![0.0; fft_size], vec![0.0; fft_size]],
            active: 0,
            fade_remaining: 0,
            queued: vec![0.0; response_len],
            queued_len: None,
            input_spectrum: vec![Complex::new(0.0, 0.0); fft_size],
            work: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            fade_buffer: vec![0.0; PARTITION],
        }
    }

    /// Cross-fade to a new impulse response. Taps past `response_len` are dropped.
    /// During a running fade the response is queued instead.
    pub fn load(&mut self, response: &[f32]) {
        if self.fade_remaining > 0 {
            let taps = response.len().min(self.response_len);
            self.queued[..taps].copy_from_slice(&response[..taps]);
            self.queued_len = Some(taps);
            return;
        }
        self.begin_fade(response);
    }

    fn begin_fade(&mut self, response: &[f32]) {
        let incoming = 1 - self.active;
        self.write_spectrum(incoming, response);

        let (first, second) = self.tails.split_at_mut(1);
        if incoming == 1 {
            second[0].copy_from_slice(&first[0]);
        } else {
            first[0].copy_from_slice(&second[0]);
        }

        self.fade_remaining = CROSSFADE_SAMPLES;
    }

    /// Switch to a new impulse response without blending. Only click-free
    /// when the convolver is silent, e.g. right after [`Convolver::reset`].
    pub fn load_immediate(&mut self, response: &[f32]) {
        self.fade_remaining = 0;
        self.queued_len = None;
        self.write_spectrum(self.active, response);
    }

    fn write_spectrum(&mut self, slot: usize, response: &[f32]) {
        let taps = response.len().min(self.response_len);
        for (bin, &tap) in self.work.iter_mut().zip(&response[..taps]) {
            *bin = Complex::new(tap, 0.0);
        }
        for bin in &mut self.work[taps..] {
            *bin = Complex::new(0.0, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.work, &mut self.scratch);
        self.spectra[slot].copy_from_slice(&self.work);
    }

    /// Convolve `input` into `output` (overwritten). Lengths must match.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());

        for (input, output) in input.chunks(PARTITION).zip(output.chunks_mut(PARTITION)) {
            if self.fade_remaining == 0 {
                self.start_queued_fade();
            }
            self.process_partition(input, output);
        }
    }

    fn start_queued_fade(&mut self) {
        if let Some(taps) = self.queued_len.take() {
            let queued = std::mem::take(&mut self.queued);
            self.begin_fade(&queued[..taps]);
            self.queued = queued;
        }
    }

    fn process_partition(&mut self, input: &[f32], output: &mut [f32]) {
        let n = input.len();
        for (bin, &x) in self.input_spectrum.iter_mut().zip(input) {
            *bin = Complex::new(x, 0.0);
        }
        for bin in &mut self.input_spectrum[n..] {
            *bin = Complex::new(0.0, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.input_spectrum, &mut self.scratch);

        self.convolve_slot(self.active, output);
        if self.fade_remaining == 0 {
            return;
        }

        let incoming = 1 - self.active;
        let mut faded = std::mem::take(&mut self.fade_buffer);
        self.convolve_slot(incoming, &mut faded[..n]);

        for (out, &new) in output.iter_mut().zip(&faded[..n]) {
            if self.fade_remaining > 0 {
                self.fade_remaining -= 1;
                let t = 1.0 - self.fade_remaining as f32 / CROSSFADE_SAMPLES as f32;
                *out += (new - *out) * t;
            } else {
                *out = new;
            }
        }
        self.fade_buffer = faded;

        if self.fade_remaining == 0 {
            self.active = incoming;
        }
    }

    /// Multiply the current input spectrum by one slot's response, emit `out.len()`
    /// samples and roll the remainder into that slot's tail.
    fn convolve_slot(&mut self, slot: usize, out: &mut [f32]) {
        let n = out.len();
        let size = self.fft_size;
        let scale = 1.0 / size as f32;

        for ((bin, x), h) in self
            .work
            .iter_mut()
            .zip(&self.input_spectrum)
            .zip(&self.spectra[slot])
        {
            *bin = x * h;
        }
        self.inverse
            .process_with_scratch(&mut self.work, &mut self.scratch);

        let tail = &mut self.tails[slot];
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.work[i].re * scale + tail[i];
        }
        for j in 0..size - n {
            tail[j] = tail[j + n] + self.work[j + n].re * scale;
        }
        tail[size - n..].fill(0.0);
    }

    /// Drop any ringing from previous input. A running fade finishes at once
    /// and a queued response becomes active without blending.
    pub fn reset(&mut self) {
        if self.fade_remaining > 0 {
            self.active = 1 - self.active;
            self.fade_remaining = 0;
        }
        if let Some(taps) = self.queued_len.take() {
            let queued = std::mem::take(&mut self.queued);
            self.write_spectrum(self.active, &queued[..taps]);
            self.queued = queued;
        }
        for tail in &mut self.tails {
            tail.fill(0.0);
        }
    }

    /// True while a fade is running or a response is queued behind one.
    pub fn is_fading(&self) -> bool {
        self.fade_remaining > 0 || self.queued_len.is_some()
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(len: usize, seed: u64) -> Vec<f32> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..len).map(|_| 2.0 * rng.f32() - 1.0).collect()
    }

    fn run_chunked(conv: &mut Convolver, input: &[f32], chunk: usize) -> Vec<f32> {
        let mut output = vec![0.0; input.len()];
        for (i, o) in input.chunks(chunk).zip(output.chunks_mut(chunk)) {
            conv.process(i, o);
        }
        output
    }

    fn direct_convolution(input: &[f32], response: &[f32]) -> Vec<f32> {
        (0..input.len())
            .map(|n| {
                response
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k <= n)
                    .map(|(k, h)| h * input[n - k])
                    .sum()
            })
            .collect()
    }

    #[test]
    fn fft_size_covers_linear_convolution() {
        let mut planner = FftPlanner::new();
        assert_eq!(Convolver::new(128, &mut planner).fft_size(), 256);
        assert_eq!(Convolver::new(512, &mut planner).fft_size(), 1024);
        assert_eq!(Convolver::new(4096, &mut planner).fft_size(), 1024);
    }

    #[test]
    fn default_response_is_identity() {
        let mut planner = FftPlanner::new();
        let mut conv = Convolver::new(128, &mut planner);
        let input = noise(1_000, 1);

        for chunk in [37, 128, 300] {
            conv.reset();
            let output = run_chunked(&mut conv, &input, chunk);
            for (a, b) in input.iter().zip(&output) {
                assert!((a - b).abs() < 1e-5, "chunk {chunk}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn delayed_impulse_shifts_signal() {
        let mut planner = FftPlanner::new();
        let mut conv = Convolver::new(16, &mut planner);
        conv.load_immediate(&[0.0, 0.0, 0.0, 1.0]);

        let input = noise(400, 2);
        let output = run_chunked(&mut conv, &input, 50);
        for n in 0..3 {
            assert!(output[n].abs() < 1e-5);
        }
        for n in 3..input.len() {
            assert!((output[n] - input[n - 3]).abs() < 1e-5);
        }
    }

    #[test]
    fn matches_direct_convolution_across_partitions() {
        let mut planner = FftPlanner::new();
        let response = noise(100, 3);
        let mut conv = Convolver::new(response.len(), &mut planner);
        conv.load_immediate(&response);

        let input = noise(700, 4);
        let expected = direct_convolution(&input, &response);
        let output = run_chunked(&mut conv, &input, 97);
        for (n, (a, b)) in expected.iter().zip(&output).enumerate() {
            assert!((a - b).abs() < 1e-3, "sample {n}: {a} vs {b}");
        }
    }

    #[test]
    fn load_cross_fades_without_jumps() {
        let mut planner = FftPlanner::new();
        let mut conv = Convolver::new(128, &mut planner);
        let input: Vec<f32> = (0..2_048)
            .map(|n| (std::f32::consts::TAU * 100.0 * n as f32 / 48_000.0).sin())
            .collect();

        let mut output = vec![0.0; input.len()];
        conv.process(&input[..512], &mut output[..512]);
        conv.load(&[0.5]);
        assert!(conv.is_fading());
        conv.process(&input[512..], &mut output[512..]);
        assert!(!conv.is_fading());

        for pair in output.windows(2) {
            assert!((pair[1] - pair[0]).abs() < 0.05, "jump of {}", pair[1] - pair[0]);
        }
        let settled = 512 + CROSSFADE_SAMPLES;
        for n in settled..input.len() {
            assert!((output[n] - 0.5 * input[n]).abs() < 1e-4);
        }
    }

    #[test]
    fn load_during_fade_waits_for_it_to_finish() {
        let mut planner = FftPlanner::new();
        let mut conv = Convolver::new(8, &mut planner);
        conv.load_immediate(&[1.0]);

        let input = [1.0f32; 64];
        let mut block = [0.0f32; 64];
        let mut output = Vec::new();

        conv.process(&input, &mut block);
        output.extend_from_slice(&block);
        conv.load(&[0.0]);
        conv.process(&input, &mut block);
        output.extend_from_slice(&block);

        // Arrives 64 samples into a 256-sample fade
        conv.load(&[0.0, 0.0, 0.0, 0.0]);
        conv.load(&[0.5]);
        assert!(conv.is_fading());
        for _ in 0..12 {
            conv.process(&input, &mut block);
            output.extend_from_slice(&block);
        }
        assert!(!conv.is_fading());

        let max_step = output
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .fold(0.0f32, f32::max);
        assert!(
            max_step <= 1.0 / CROSSFADE_SAMPLES as f32 + 1e-4,
            "largest step {max_step}"
        );
        assert!(output[64 + CROSSFADE_SAMPLES - 1].abs() < 1e-4);
        assert!((output[output.len() - 1] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn reset_applies_queued_response() {
        let mut planner = FftPlanner::new();
        let mut conv = Convolver::new(8, &mut planner);
        conv.load(&[0.0]);
        conv.load(&[0.25]);
        conv.reset();
        assert!(!conv.is_fading());

        let mut out = [0.0f32; 16];
        conv.process(&[1.0; 16], &mut out);
        assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-5));
    }

    #[test]
    fn reset_clears_ringing() {
        let mut planner = FftPlanner::new();
        let mut conv = Convolver::new(64, &mut planner);
        conv.load_immediate(&[1.0; 64]);

        let mut out = vec![0.0; 32];
        conv.process(&[1.0; 32], &mut out);
        conv.reset();
        conv.process(&[0.0; 32], &mut out);
        assert!(out.iter().all(|s| s.abs() < 1e-6));
    }
}
