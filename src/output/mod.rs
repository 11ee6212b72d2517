//! Audio output: the boundary the voice registry drives, plus the realtime
//! engine behind it.
//!
//! The control thread talks to an [`AudioOutput`]. The provided
//! implementation, [`RingOutput`], forwards each call as a [`ToneMessage`]
//! over an `rtrb` ring to a [`ToneEngine`] living in the audio callback.
//! Custom wavetables the engine no longer plays travel back on a second ring
//! so they are freed off the audio thread.
//! Master gain bypasses the ring and is shared through [`MasterGain`].

mod engine;
mod gain;
pub mod message;
#[cfg(feature = "rtrb")]
mod ring;
pub mod slot;

use std::fmt;

use thiserror::Error;

pub use engine::{ToneEngine, VOICE_LEVEL};
pub use gain::MasterGain;
pub use message::{MessageReceiver, ToneMessage};
#[cfg(feature = "rtrb")]
pub use ring::{channel, EngineLink, RingEngine, RingOutput};

use crate::tone::WaveformSpec;

/// Opaque reference to a voice owned by the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub u32);

impl fmt::Display for VoiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voice#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    #[error("audio command queue is full")]
    QueueFull,

    #[error("all {capacity} voices are in use")]
    VoicesExhausted { capacity: usize },
}

/// Commands the voice registry sends to whatever produces sound.
///
/// Calls are fire-and-forget and must never block the caller. Stopping and
/// gain changes cannot fail from the caller's point of view.
pub trait AudioOutput {
    /// Prepare a silent voice at `frequency` Hz with `waveform`.
    fn create_voice(
        &mut self,
        frequency: f64,
        waveform: &WaveformSpec,
    ) -> Result<VoiceHandle, OutputError>;

    fn start_voice(&mut self, handle: VoiceHandle) -> Result<(), OutputError>;

    /// Silence the voice and release its resources.
    fn stop_voice(&mut self, handle: VoiceHandle);

    /// Apply a new master gain to every current and future voice.
    fn set_master_gain(&mut self, gain: f32);
}
