//! Note names, key identity and the equal-tempered pitch table.

mod note;
mod table;

pub use note::{KeyId, NoteName};
pub use table::{equal_tempered, OctaveSlot, PitchTable, A4_HZ, DEFAULT_OCTAVES, OCTAVE_SLOTS};

use thiserror::Error;

/// Errors raised while resolving keys to frequencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    /// The (octave, note) pair is not in the populated part of the table.
    #[error("no key {note}{octave} in the pitch table")]
    KeyNotFound { octave: u8, note: String },

    /// Text that does not name one of the twelve semitones.
    #[error("unknown note name: {0}")]
    UnknownNote(String),

    /// Populated range does not fit the octave slots.
    #[error("octave range {low}..={high} is outside the 0..=8 slots")]
    InvalidRange { low: u8, high: u8 },
}
