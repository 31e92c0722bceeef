pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod spatial; // Binaural placement
pub mod synth; // Voice management and polyphony

pub use config::SynthConfig;
#[cfg(feature = "serde")]
pub use config::load_patch;
pub use error::{ControlError, TableError};
pub use spatial::{Azimuth, ImpulseResponseTable};
pub use synth::{build, PolySynth, SynthHandle, SynthParameters};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
