//! Waveform selection and master gain.

mod config;
mod waveform;

pub use config::{ToneConfig, DEFAULT_GAIN};
pub use waveform::{CustomWaveform, WaveformKind, WaveformSpec};

use thiserror::Error;

/// Configuration errors, reported when a value is set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToneError {
    #[error("unknown waveform: {0} (expected sine, square, sawtooth, triangle or custom)")]
    UnknownWaveform(String),

    #[error("custom waveform has {sine} sine terms but {cosine} cosine terms")]
    CoefficientMismatch { sine: usize, cosine: usize },

    #[error("custom waveform needs at least 2 terms, got {0}")]
    TooFewCoefficients(usize),

    #[error("custom waveform term {0} is not finite")]
    NonFiniteCoefficient(usize),

    #[error("gain must be a finite number, got {0}")]
    InvalidGain(f32),
}
