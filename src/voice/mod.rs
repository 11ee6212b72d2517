//! Per-key voice bookkeeping.

mod registry;

pub use registry::{Voice, VoiceRegistry};

use thiserror::Error;

use crate::output::OutputError;
use crate::pitch::PitchError;

/// Why a key could not start sounding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error(transparent)]
    Pitch(#[from] PitchError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
