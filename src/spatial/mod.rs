//! Binaural placement of oscillators.
//!
//! Each oscillator of a voice is convolved with a left and right ear impulse
//! response picked by azimuth, then scaled by a distance gain.

pub mod spatializer;
pub mod table;

pub use spatializer::Spatializer;
pub use table::{ImpulseResponseTable, StereoResponse};

/// Number of distinct azimuths, one per whole degree.
pub const AZIMUTH_COUNT: usize = 360;

/// Horizontal direction in whole degrees, clockwise from straight ahead
/// (90 = right, 270 = left). Always within `0..=359`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Azimuth(u16);

impl Azimuth {
    pub const MAX: Azimuth = Azimuth(AZIMUTH_COUNT as u16 - 1);

    /// Out-of-range degrees are clamped, not wrapped.
    pub fn new(degrees: i32) -> Self {
        Azimuth(degrees.clamp(0, Self::MAX.0 as i32) as u16)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }
}

impl From<u16> for Azimuth {
    fn from(degrees: u16) -> Self {
        Azimuth::new(degrees as i32)
    }
}

/// Linear gain for a normalized distance: 1.0 at the listener, 0.5 at the edge.
#[inline]
pub fn distance_gain(distance: f32) -> f32 {
    let distance = if distance.is_finite() {
        distance.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (1.0 - distance) / 2.0 + 0.5
}
