use std::ops::RangeInclusive;

use super::{KeyId, NoteName, PitchError};

/// Number of octave slots the instrument reserves (octaves 0-8).
pub const OCTAVE_SLOTS: usize = 9;

/// Octaves populated by [`PitchTable::default`].
pub const DEFAULT_OCTAVES: RangeInclusive<u8> = 3..=5;

/// Tuning reference: A4 in Hz.
pub const A4_HZ: f64 = 440.0;
const A4_MIDI: i32 = 69;

/// Equal-tempered frequency of a key, referenced to A4 = 440 Hz.
#[inline]
pub fn equal_tempered(key: KeyId) -> f64 {
    A4_HZ * 2.0_f64.powf((key.midi() - A4_MIDI) as f64 / 12.0)
}

/// Immutable (octave, note) -> Hz table.
///
/// Every octave slot exists. Slots inside the populated range hold all twelve
/// semitones, the rest stay empty and reject lookups.
#[derive(Debug, Clone)]
pub struct PitchTable {
    slots: [Option<[f64; 12]>; OCTAVE_SLOTS],
    populated: RangeInclusive<u8>,
}

/// One octave slot, as handed to the renderer.
#[derive(Debug, Clone)]
pub struct OctaveSlot {
    pub octave: u8,
    /// Playable (natural) keys in this octave. Empty for reserved slots.
    pub keys: Vec<KeyId>,
}

impl PitchTable {
    /// Build the table, filling only the octaves in `populated`.
    pub fn build(populated: RangeInclusive<u8>) -> Result<Self, PitchError> {
        let (low, high) = (*populated.start(), *populated.end());
        if low > high || high as usize >= OCTAVE_SLOTS {
            return Err(PitchError::InvalidRange { low, high });
        }

        let slots = populate(&populated);
        Ok(Self { slots, populated })
    }

    /// Frequency for an octave and a note name such as `"A"` or `"C#"`.
    pub fn lookup(&self, octave: u8, note: &str) -> Result<f64, PitchError> {
        let name = note.parse::<NoteName>().map_err(|_| PitchError::KeyNotFound {
            octave,
            note: note.to_string(),
        })?;
        self.frequency(KeyId::new(octave, name))
    }

    pub fn frequency(&self, key: KeyId) -> Result<f64, PitchError> {
        self.slots
            .get(key.octave as usize)
            .copied()
            .flatten()
            .map(|row| row[key.note.semitone() as usize])
            .ok_or_else(|| PitchError::KeyNotFound {
                octave: key.octave,
                note: key.note.to_string(),
            })
    }

    pub fn populated(&self) -> RangeInclusive<u8> {
        self.populated.clone()
    }

    /// Natural keys of the populated octaves, lowest pitch first.
    pub fn playable_keys(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.populated.clone().flat_map(|octave| {
            NoteName::ALL
                .into_iter()
                .filter(|note| note.is_natural())
                .map(move |note| KeyId::new(octave, note))
        })
    }

    /// Every octave slot, including the reserved empty ones.
    pub fn octaves(&self) -> Vec<OctaveSlot> {
        (0..OCTAVE_SLOTS as u8)
            .map(|octave| OctaveSlot {
                octave,
                keys: if self.populated.contains(&octave) {
                    NoteName::ALL
                        .into_iter()
                        .filter(|note| note.is_natural())
                        .map(|note| KeyId::new(octave, note))
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect()
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self {
            slots: populate(&DEFAULT_OCTAVES),
            populated: DEFAULT_OCTAVES,
        }
    }
}

fn populate(populated: &RangeInclusive<u8>) -> [Option<[f64; 12]>; OCTAVE_SLOTS] {
    std::array::from_fn(|octave| {
        let octave = octave as u8;
        populated.contains(&octave).then(|| {
            NoteName::ALL.map(|note| equal_tempered(KeyId::new(octave, note)))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn a4_is_exactly_440() {
        let table = PitchTable::default();
        assert_eq!(table.lookup(4, "A").unwrap(), 440.0);
    }

    #[test]
    fn c3_matches_two_decimal_reference() {
        let table = PitchTable::default();
        assert_close(table.lookup(3, "C").unwrap(), 130.81, 0.005);
    }

    #[test]
    fn b5_matches_full_precision_reference() {
        let table = PitchTable::default();
        assert_close(table.lookup(5, "B").unwrap(), 987.7666025122483, 1e-9);
    }

    #[test]
    fn octaves_double_frequency() {
        let table = PitchTable::default();
        let a3 = table.lookup(3, "A").unwrap();
        let a5 = table.lookup(5, "A").unwrap();
        assert_close(a3, 220.0, 1e-9);
        assert_close(a5, 880.0, 1e-9);
    }

    #[test]
    fn sharps_are_resolvable() {
        let table = PitchTable::default();
        assert_close(table.lookup(4, "C#").unwrap(), 277.182630976872, 1e-9);
    }

    #[test]
    fn unpopulated_octave_is_key_not_found() {
        let table = PitchTable::default();
        let err = table.lookup(8, "F").unwrap_err();
        assert!(matches!(err, PitchError::KeyNotFound { octave: 8, .. }));
    }

    #[test]
    fn unknown_note_name_is_key_not_found() {
        let table = PitchTable::default();
        assert!(matches!(
            table.lookup(4, "H"),
            Err(PitchError::KeyNotFound { octave: 4, .. })
        ));
    }

    #[test]
    fn octave_past_last_slot_is_key_not_found() {
        let table = PitchTable::default();
        assert!(table.lookup(42, "C").is_err());
    }

    #[test]
    fn default_exposes_21_naturals() {
        let table = PitchTable::default();
        let keys: Vec<_> = table.playable_keys().collect();
        assert_eq!(keys.len(), 21);
        assert_eq!(keys.first().unwrap().to_string(), "C3");
        assert_eq!(keys.last().unwrap().to_string(), "B5");
        assert!(keys.iter().all(|k| k.note.is_natural()));
    }

    #[test]
    fn reserved_slots_are_empty() {
        let table = PitchTable::default();
        let slots = table.octaves();
        assert_eq!(slots.len(), OCTAVE_SLOTS);
        assert!(slots[0].keys.is_empty());
        assert_eq!(slots[4].keys.len(), 7);
        assert!(slots[8].keys.is_empty());
    }

    #[test]
    fn build_matches_default() {
        let built = PitchTable::build(DEFAULT_OCTAVES).unwrap();
        let default = PitchTable::default();
        for key in default.playable_keys() {
            assert_eq!(built.frequency(key).unwrap(), default.frequency(key).unwrap());
        }
    }

    #[test]
    fn populated_range_is_configurable() {
        let table = PitchTable::build(0..=8).unwrap();
        assert_eq!(table.playable_keys().count(), 63);
        assert_close(table.lookup(8, "F").unwrap(), 5587.651702928062, 1e-3);
    }

    #[test]
    fn rejects_range_outside_slots() {
        assert!(matches!(
            PitchTable::build(7..=9),
            Err(PitchError::InvalidRange { low: 7, high: 9 })
        ));
        assert!(PitchTable::build(5..=3).is_err());
    }
}
