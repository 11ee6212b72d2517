/*
Note Names and Key Identity
===========================

The keyboard uses the twelve equal-tempered semitone names:

    C  C#  D  D#  E  F  F#  G  G#  A  A#  B
    0  1   2  3   4  5  6   7  8   9  10  11   <- semitone within the octave

Naturals (C D E F G A B) are the white keys. Sharps sit between them and are
resolvable through the pitch table but are not wired to a playable key.

Octave numbering follows scientific pitch notation: C4 is middle C and A4 is
the 440 Hz tuning reference. The MIDI note number of a key is

    midi = 12 * (octave + 1) + semitone

which puts C4 at 60 and A4 at 69.

A key is identified by the (octave, note) pair, written "C4", "F#3", "A5".
The pair is always carried as one value (`KeyId`) so a key can never be
indexed by half of its identity.
*/

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::PitchError;

/// One of the twelve equal-tempered semitone names.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoteName {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl NoteName {
    /// All twelve names in ascending order.
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    /// Semitone offset from C (0-11).
    pub fn semitone(self) -> u8 {
        self as u8
    }

    pub fn is_natural(self) -> bool {
        !matches!(
            self,
            NoteName::Cs | NoteName::Ds | NoteName::Fs | NoteName::Gs | NoteName::As
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteName {
    type Err = PitchError;

    /// Accepts sharp spellings ("C#") and their flat aliases ("Db").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let note = match s {
            "C" => NoteName::C,
            "C#" | "Db" => NoteName::Cs,
            "D" => NoteName::D,
            "D#" | "Eb" => NoteName::Ds,
            "E" => NoteName::E,
            "F" => NoteName::F,
            "F#" | "Gb" => NoteName::Fs,
            "G" => NoteName::G,
            "G#" | "Ab" => NoteName::Gs,
            "A" => NoteName::A,
            "A#" | "Bb" => NoteName::As,
            "B" => NoteName::B,
            _ => return Err(PitchError::UnknownNote(s.to_string())),
        };
        Ok(note)
    }
}

/// Composite identity of a key: octave plus note name.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId {
    pub octave: u8,
    pub note: NoteName,
}

impl KeyId {
    pub const fn new(octave: u8, note: NoteName) -> Self {
        Self { octave, note }
    }

    /// MIDI note number (C4 = 60, A4 = 69).
    pub fn midi(self) -> i32 {
        12 * (self.octave as i32 + 1) + self.note.semitone() as i32
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

impl FromStr for KeyId {
    type Err = PitchError;

    /// Parses "C4", "F#3", "Bb5".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| PitchError::UnknownNote(s.to_string()))?;
        let (name, octave) = s.split_at(split);
        let note = name.parse()?;
        let octave = octave
            .parse()
            .map_err(|_| PitchError::UnknownNote(s.to_string()))?;
        Ok(KeyId::new(octave, note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c_is_60() {
        assert_eq!(KeyId::new(4, NoteName::C).midi(), 60);
    }

    #[test]
    fn a440_is_69() {
        assert_eq!(KeyId::new(4, NoteName::A).midi(), 69);
    }

    #[test]
    fn seven_naturals_per_octave() {
        let naturals: Vec<_> = NoteName::ALL.iter().filter(|n| n.is_natural()).collect();
        assert_eq!(naturals.len(), 7);
    }

    #[test]
    fn flats_alias_sharps() {
        assert_eq!("Db".parse::<NoteName>().unwrap(), NoteName::Cs);
        assert_eq!("Bb".parse::<NoteName>().unwrap(), NoteName::As);
    }

    #[test]
    fn key_display_round_trips() {
        for text in ["C4", "F#3", "A5", "B0"] {
            let key: KeyId = text.parse().unwrap();
            assert_eq!(key.to_string(), text);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("H".parse::<NoteName>().is_err());
        assert!("C".parse::<KeyId>().is_err());
        assert!("X4".parse::<KeyId>().is_err());
    }
}
