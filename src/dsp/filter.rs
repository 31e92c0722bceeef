use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type              | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | outside      |
| notch / band-stop | outside         | around       |

Topology-preserving-transform state-variable filter. One pass produces all
four responses; `filter_type` picks which one is returned.

Coefficients:

    g = tan(π · cutoff / sample_rate)
    k = 2 - 2 · resonance          (k = 2: Q 0.5, k → 0: self-oscillation)

Coefficients are cached and only recomputed when cutoff, resonance, type or
sample rate actually change. Every recompute clears the integrator state, so
stale energy from the old response never leaks through the new one.

Inputs are clamped before use: cutoff to [MIN_CUTOFF_HZ, 0.49 · fs] so tan()
stays finite, resonance to [0, MAX_RESONANCE] so k never reaches zero. NaN is
ignored and the previous value kept.
*/

pub const MIN_CUTOFF_HZ: f32 = 20.0;
pub const MAX_RESONANCE: f32 = 0.95;
const NYQUIST_MARGIN: f32 = 0.49;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,

    cutoff_hz: f32,
    resonance: f32,
    filter_type: FilterType,
    sample_rate: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 2.0,
            cutoff_hz: 1000.0,
            resonance: 0.0,
            filter_type,
            sample_rate,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::LowPass, sample_rate);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn highpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::HighPass, sample_rate);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    #[inline]
    fn max_cutoff(&self) -> f32 {
        NYQUIST_MARGIN * self.sample_rate
    }

    fn update_coefficients(&mut self) {
        self.cutoff_hz = self.cutoff_hz.clamp(MIN_CUTOFF_HZ, self.max_cutoff());
        self.resonance = self.resonance.clamp(0.0, MAX_RESONANCE);

        self.g = (PI * self.cutoff_hz / self.sample_rate).tan();
        self.k = 2.0 - 2.0 * self.resonance;
        self.reset();
    }

    pub fn set_type(&mut self, filter_type: FilterType) {
        if filter_type != self.filter_type {
            self.filter_type = filter_type;
            self.update_coefficients();
        }
    }

    /// Compared after clamping, so repeating an out-of-range request is a no-op.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz.is_nan() {
            return;
        }
        let cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF_HZ, self.max_cutoff());
        if cutoff_hz != self.cutoff_hz {
            self.cutoff_hz = cutoff_hz;
            self.update_coefficients();
        }
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        if resonance.is_nan() {
            return;
        }
        let resonance = resonance.clamp(0.0, MAX_RESONANCE);
        if resonance != self.resonance {
            self.resonance = resonance;
            self.update_coefficients();
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.update_coefficients();
        }
    }

    #[inline]
    pub fn tick(&mut self, sample: f32) -> FilterOutputs {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    /// Filter one sample with the selected response.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.tick(sample);

        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::Notch => outputs.notch,
        }
    }

    /// Filter a block in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

/// Two identical filters, one per channel.
pub struct StereoFilter {
    left: SVFilter,
    right: SVFilter,
}

impl StereoFilter {
    pub fn new(filter_type: FilterType, sample_rate: f32) -> Self {
        Self {
            left: SVFilter::new(filter_type, sample_rate),
            right: SVFilter::new(filter_type, sample_rate),
        }
    }

    pub fn configure(&mut self, filter_type: FilterType, cutoff_hz: f32, resonance: f32) {
        for filter in [&mut self.left, &mut self.right] {
            filter.set_type(filter_type);
            filter.set_cutoff(cutoff_hz);
            filter.set_resonance(resonance);
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.left.set_sample_rate(sample_rate);
        self.right.set_sample_rate(sample_rate);
    }

    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.left.process_block(left);
        self.right.process_block(right);
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
