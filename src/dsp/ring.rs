use std::f32::consts::TAU;

/// Highest modulator frequency accepted, in Hz.
pub const MAX_RING_HZ: f32 = 4_000.0;

/// Multiplies a signal by a sine carrier. A frequency of 0 disables it.
///
/// Frequencies below 1 Hz (other than 0) are raised to 1 Hz, anything above
/// [`MAX_RING_HZ`] is lowered to it.
pub struct RingModulator {
    frequency: f32,
    sample_rate: f32,
    phase: f32,
    phase_inc: f32,
}

impl RingModulator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frequency: 0.0,
            sample_rate,
            phase: 0.0,
            phase_inc: 0.0,
        }
    }

    /// Changing the frequency restarts the carrier at phase zero.
    pub fn set_frequency(&mut self, frequency: f32) {
        let frequency = clamp_frequency(frequency);
        if frequency == self.frequency {
            return;
        }
        self.frequency = frequency;
        self.phase = 0.0;
        self.update_increment();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    fn update_increment(&mut self) {
        self.phase_inc = TAU * self.frequency / self.sample_rate;
    }

    pub fn is_enabled(&self) -> bool {
        self.frequency > 0.0
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Modulate both channels in place with the same carrier.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if !self.is_enabled() {
            return;
        }

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let carrier = self.phase.sin();
            *l *= carrier;
            *r *= carrier;

            self.phase += self.phase_inc;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }
}

fn clamp_frequency(frequency: f32) -> f32 {
    if !frequency.is_finite() || frequency <= 0.0 {
        0.0
    } else {
        frequency.clamp(1.0, MAX_RING_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_passes_through() {
        let mut ring = RingModulator::new(48_000.0);
        let mut left = vec![0.5; 64];
        let mut right = vec![-0.5; 64];
        ring.process(&mut left, &mut right);
        assert!(left.iter().all(|&s| s == 0.5));
        assert!(right.iter().all(|&s| s == -0.5));
    }

    #[test]
    fn modulates_with_sine_carrier() {
        let mut ring = RingModulator::new(48_000.0);
        ring.set_frequency(1_000.0);
        let mut left = vec![1.0; 48];
        let mut right = vec![1.0; 48];
        ring.process(&mut left, &mut right);

        assert_eq!(left[0], 0.0);
        assert!((left[12] - 1.0).abs() < 1e-4, "quarter period peaks");
        assert!((right[36] + 1.0).abs() < 1e-4);
    }

    #[test]
    fn frequency_is_clamped() {
        let mut ring = RingModulator::new(48_000.0);
        ring.set_frequency(10_000.0);
        assert_eq!(ring.frequency(), MAX_RING_HZ);
        ring.set_frequency(0.2);
        assert_eq!(ring.frequency(), 1.0);
        ring.set_frequency(f32::NAN);
        assert!(!ring.is_enabled());
    }
}
