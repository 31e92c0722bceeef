//! Audio device setup and the render callback

use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use spatial_synth::{
    load_patch,
    synth::{EnvelopeMode, SynthParameters},
    ImpulseResponseTable, SynthConfig,
};

use super::{ui::KeyboardApp, Args};

/// Frames of output kept for the oscilloscope
const SCOPE_CAPACITY: usize = 4096;

pub struct SpatialSynth {
    params: SynthParameters,
    noise_seed: Option<u64>,
}

impl SpatialSynth {
    pub fn from_args(args: &Args) -> EyreResult<Self> {
        let mut params = match &args.patch {
            Some(path) => load_patch(path)
                .wrap_err_with(|| format!("failed to load patch {}", path.display()))?,
            None => SynthParameters::default(),
        };
        if args.percussive {
            params.envelope_mode = EnvelopeMode::percussive();
        }
        if let Some(hz) = args.ring_mod {
            params.ring_mod_hz = hz;
        }

        Ok(Self {
            params: params.sanitized(),
            noise_seed: args.seed,
        })
    }

    /// Open the default device, start rendering and hand the terminal to the UI.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        info!(sample_rate, channels, "opened output device");

        let mut config = SynthConfig {
            sample_rate,
            ..SynthConfig::default()
        };
        if let Some(seed) = self.noise_seed {
            config.noise_seed = seed;
        }

        let table = Arc::new(ImpulseResponseTable::synthetic(sample_rate));
        let (mut handle, mut synth) = spatial_synth::build(&config, table);
        let (mut scope_tx, scope_rx) = RingBuffer::<(f32, f32)>::new(SCOPE_CAPACITY);

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _| {
                    data.fill(0.0);
                    synth.render(data, channels, sample_rate);

                    for frame in data.chunks_exact(channels) {
                        let left = frame[0];
                        let right = if channels > 1 { frame[1] } else { left };
                        if scope_tx.push((left, right)).is_err() {
                            break;
                        }
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        handle
            .update_parameters(self.params)
            .wrap_err("initial patch was not accepted")?;

        let mut terminal = ratatui::init();
        let result = KeyboardApp::new(handle, scope_rx, sample_rate).run(&mut terminal);
        ratatui::restore();
        result
    }
}
