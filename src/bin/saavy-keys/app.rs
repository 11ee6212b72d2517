//! Audio device setup and the top-level run loop

use std::io::stdout;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};
use rtrb::{Consumer, RingBuffer};

use saavy_keys::{channel, RingEngine, Session, ToneConfig, MAX_BLOCK_SIZE};

use super::ui::KeysApp;
use super::PlayArgs;

/// Samples kept in flight for the scope and spectrum panels
const SCOPE_RING_SIZE: usize = 8192;

/// The default output device, not yet streaming.
pub struct AudioDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl AudioDevice {
    pub fn open_default() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;
        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    /// Start streaming `engine`. Returns the stream (keep it alive) and the
    /// receiving end of the scope ring.
    pub fn start(self, mut engine: RingEngine) -> EyreResult<(cpal::Stream, Consumer<f32>)> {
        let channels = self.config.channels() as usize;
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        tracing::info!(
            sample_rate = self.sample_rate(),
            channels,
            voices = engine.capacity(),
            "starting audio stream"
        );

        let stream = self.device.build_output_stream(
            &self.config.into(),
            move |data: &mut [f32], _| {
                for out in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let frames = out.len() / channels;
                    let block = &mut render_buf[..frames];
                    engine.render_block(block);

                    // Mono to all channels
                    for (frame, &s) in out.chunks_mut(channels).zip(block.iter()) {
                        frame.fill(s);
                    }

                    // Scope gets whatever fits; the UI drains it every frame
                    for &s in block.iter() {
                        if scope_tx.push(s).is_err() {
                            break;
                        }
                    }
                }
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;
        Ok((stream, scope_rx))
    }
}

/// Open the device, build the session and hand the terminal to the UI.
pub fn run(args: PlayArgs) -> EyreResult<()> {
    let pitch = args.range.table()?;

    let mut tone = ToneConfig::new(args.waveform, args.gain).wrap_err("invalid gain")?;
    if !args.custom_sine.is_empty() || !args.custom_cosine.is_empty() {
        let mut cosine = args.custom_cosine;
        if cosine.is_empty() {
            cosine = vec![0.0; args.custom_sine.len()];
        }
        tone.set_custom(args.custom_sine, cosine)
            .wrap_err("invalid custom waveform")?;
    }

    let device = AudioDevice::open_default()?;
    let sample_rate = device.sample_rate();
    let (output, engine) = channel(sample_rate, args.voices.max(1), tone.current_gain());
    let (_stream, scope_rx) = device.start(engine)?;

    let session = Session::new(pitch, tone, output);
    let mut app = KeysApp::new(session, scope_rx, sample_rate);

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;
    let result = app.run(&mut terminal);
    let restored = execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();

    result?;
    restored?;
    Ok(())
}
