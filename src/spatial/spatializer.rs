use rustfft::FftPlanner;

use crate::{
    dsp::convolver::Convolver,
    spatial::{distance_gain, Azimuth, ImpulseResponseTable},
};

/// Places one mono source: a convolver per ear plus a distance gain.
pub struct Spatializer {
    left: Convolver,
    right: Convolver,
    azimuth: Option<Azimuth>,
    gain: f32,
}

impl Spatializer {
    pub fn new(response_len: usize, planner: &mut FftPlanner<f32>) -> Self {
        Self {
            left: Convolver::new(response_len, planner),
            right: Convolver::new(response_len, planner),
            azimuth: None,
            gain: 1.0,
        }
    }

    /// Select the table entry for `azimuth`. With `crossfade` the change is
    /// blended in, queued behind any fade still running; otherwise it is
    /// immediate. Reloading the current azimuth with a cross-fade is a no-op.
    pub fn load_response(
        &mut self,
        table: &ImpulseResponseTable,
        azimuth: Azimuth,
        crossfade: bool,
    ) {
        if crossfade && self.azimuth == Some(azimuth) {
            return;
        }

        let response = table.lookup(azimuth);
        if crossfade {
            self.left.load(&response.left);
            self.right.load(&response.right);
        } else {
            self.left.load_immediate(&response.left);
            self.right.load_immediate(&response.right);
        }
        self.azimuth = Some(azimuth);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.gain = distance_gain(distance);
    }

    /// Render `input` into the two ear buffers (overwritten).
    pub fn process(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32]) {
        self.left.process(input, left);
        self.right.process(input, right);

        if self.gain != 1.0 {
            for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                *l *= self.gain;
                *r *= self.gain;
            }
        }
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    pub fn azimuth(&self) -> Option<Azimuth> {
        self.azimuth
    }
}
