use std::f32::consts::FRAC_PI_2;

use tracing::debug;

use crate::{
    dsp::convolver::MAX_RESPONSE_LEN,
    error::TableError,
    spatial::{Azimuth, AZIMUTH_COUNT},
};

/*
Synthetic Head Model
====================

Measured head-related impulse responses cannot ship with the crate, so
`ImpulseResponseTable::synthetic` builds a plausible set from a spherical
head. For a source at azimuth φ (clockwise, 90° = right):

  lateral   sin φ         +1 fully right, -1 fully left
  rear      max(0, -cos φ)

Per ear, `toward` is the lateral component pointing at that ear (+sin φ for
the right ear, -sin φ for the left). From it:

  exposure  max(0,  toward)       how directly the ear faces the source
  shadow    max(0, -toward)       how much of the head is in the way

Interaural time difference (Woodworth):

    θ   = asin(|sin φ|)
    ITD = a / c · (θ + sin θ)         a = 8.75 cm, c = 343 m/s

The shadowed ear is delayed by ITD on top of a small common delay. The delay
is fractional, spread linearly over two neighbouring taps.

The delayed impulse then runs through a one-pole lowpass whose pole darkens
the shadowed ear and, less so, rear sources:

    pole = 0.05 + 0.6 · shadow + 0.25 · rear
    gain = (1 + 0.25 · exposure) · (1 - 0.5 · shadow) · (1 - 0.2 · rear)

At 0° both ears are identical; at 90° the right ear is louder, brighter and
earlier than the left.
*/

const HEAD_RADIUS_M: f32 = 0.0875;
const SPEED_OF_SOUND: f32 = 343.0;
const BASE_DELAY_SAMPLES: f32 = 2.0;
/// Taps per ear in the synthetic table.
pub const SYNTHETIC_RESPONSE_LEN: usize = 128;

/// Left and right ear impulse responses for one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoResponse {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl StereoResponse {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Read-only azimuth → stereo response table. Build once, share via `Arc`.
#[derive(Debug)]
pub struct ImpulseResponseTable {
    responses: Vec<StereoResponse>,
    response_len: usize,
}

impl ImpulseResponseTable {
    /// Wrap caller-provided responses, index = azimuth in degrees.
    pub fn new(responses: Vec<StereoResponse>) -> Result<Self, TableError> {
        let first = responses.first().ok_or(TableError::Empty)?;
        let response_len = first.len();

        if responses.len() > AZIMUTH_COUNT {
            return Err(TableError::TooManyEntries {
                count: responses.len(),
                max: AZIMUTH_COUNT,
            });
        }
        if response_len == 0 {
            return Err(TableError::Empty);
        }
        if response_len > MAX_RESPONSE_LEN {
            return Err(TableError::TooLong {
                len: response_len,
                max: MAX_RESPONSE_LEN,
            });
        }

        for (index, response) in responses.iter().enumerate() {
            for found in [response.left.len(), response.right.len()] {
                if found != response_len {
                    return Err(TableError::LengthMismatch {
                        index,
                        expected: response_len,
                        found,
                    });
                }
            }
        }

        debug!(
            entries = responses.len(),
            taps = response_len,
            "impulse response table loaded"
        );
        Ok(Self {
            responses,
            response_len,
        })
    }

    /// Parametric spherical-head table with one entry per degree.
    pub fn synthetic(sample_rate: f32) -> Self {
        let responses = (0..AZIMUTH_COUNT)
            .map(|degrees| head_model_response(degrees as f32, sample_rate))
            .collect();

        debug!(sample_rate, "synthesized head model responses");
        Self {
            responses,
            response_len: SYNTHETIC_RESPONSE_LEN,
        }
    }

    /// Response for `azimuth`, clamped to the last entry for short tables.
    pub fn lookup(&self, azimuth: Azimuth) -> &StereoResponse {
        let index = (azimuth.degrees() as usize).min(self.responses.len() - 1);
        &self.responses[index]
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Taps per ear, equal for every entry.
    pub fn response_len(&self) -> usize {
        self.response_len
    }
}

fn head_model_response(degrees: f32, sample_rate: f32) -> StereoResponse {
    let phi = degrees.to_radians();
    let lateral = phi.sin();
    let rear = (-phi.cos()).max(0.0);

    let theta = lateral.abs().min(1.0).asin().min(FRAC_PI_2);
    let itd_samples = HEAD_RADIUS_M / SPEED_OF_SOUND * (theta + theta.sin()) * sample_rate;

    StereoResponse {
        left: ear_response(-lateral, rear, itd_samples),
        right: ear_response(lateral, rear, itd_samples),
    }
}

fn ear_response(toward: f32, rear: f32, itd_samples: f32) -> Vec<f32> {
    let exposure = toward.max(0.0);
    let shadow = (-toward).max(0.0);

    let pole = 0.05 + 0.6 * shadow + 0.25 * rear;
    let gain = (1.0 + 0.25 * exposure) * (1.0 - 0.5 * shadow) * (1.0 - 0.2 * rear);
    let delay = BASE_DELAY_SAMPLES + if shadow > 0.0 { itd_samples } else { 0.0 };

    let mut taps = vec![0.0f32; SYNTHETIC_RESPONSE_LEN];
    let whole = delay.floor() as usize;
    let frac = delay - delay.floor();
    if whole + 1 < taps.len() {
        taps[whole] = 1.0 - frac;
        taps[whole + 1] = frac;
    }

    // y[n] = (1 - p)·x[n] + p·y[n-1], unity at DC
    let mut state = 0.0;
    for tap in taps.iter_mut() {
        state = (1.0 - pole) * *tap + pole * state;
        *tap = state * gain;
    }
    taps
}
