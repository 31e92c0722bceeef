//! Engine construction settings and patch loading.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;
use std::time::Duration;
#[cfg(feature = "serde")]
use tracing::info;

#[cfg(feature = "serde")]
use crate::{error::ConfigError, synth::params::SynthParameters};

/// Fixed settings chosen when the synth is built.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Initial sample rate; `render` follows the device afterwards.
    pub sample_rate: f32,
    /// Base seed for every noise oscillator.
    pub noise_seed: u64,
    /// How long control-side sends wait for the renderer to take the previous command.
    pub ack_timeout_ms: u64,
    /// Depth of the voice status ring.
    pub status_capacity: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            noise_seed: 0x5EED,
            ack_timeout_ms: 100,
            status_capacity: 16,
        }
    }
}

impl SynthConfig {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(&read(path.as_ref())?)?;
        info!(path = %path.as_ref().display(), "loaded synth config");
        Ok(config)
    }
}

/// Read a TOML patch file into a sanitized parameter snapshot.
#[cfg(feature = "serde")]
pub fn load_patch(path: impl AsRef<Path>) -> Result<SynthParameters, ConfigError> {
    let path = path.as_ref();
    let params = SynthParameters::from_toml_str(&read(path)?)?;
    info!(path = %path.display(), "loaded patch");
    Ok(params)
}

#[cfg(feature = "serde")]
fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::dsp::Waveform;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = SynthConfig::from_toml_str("noise_seed = 7").unwrap();
        assert_eq!(config.noise_seed, 7);
        assert_eq!(config.sample_rate, 48_000.0);
        assert_eq!(config.ack_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn load_patch_reads_and_sanitizes() {
        let path = std::env::temp_dir()
            .join(format!("spatial_synth_patch_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "total_gain_db = 50.0\n[amp_envelope]\nattack = 0.5\n",
        )
        .unwrap();

        let params = load_patch(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(params.total_gain_db, 10.0);
        assert_eq!(params.amp_envelope.attack, 0.5);
        assert_eq!(params.oscillators[0].waveform, Waveform::Sine);
    }

    #[test]
    fn missing_patch_is_io_error() {
        let err = load_patch("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
