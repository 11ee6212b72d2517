//! Property-based tests for the voice lifecycle.
//!
//! Random pointer traffic over a handful of keys, interleaved with renders,
//! gain and waveform changes. Whatever the order, a key sounds exactly when
//! it is pressed and the audio side agrees with the control side.

use proptest::prelude::*;
use saavy_keys::{
    Buttons, InputStateMachine, KeyId, NoteName, PitchTable, PointerEvent, PointerKind, Session,
    ToneConfig, WaveformKind,
};

/// C4, G4, C5 and one key outside the populated octaves.
const KEYS: [KeyId; 4] = [
    KeyId::new(4, NoteName::C),
    KeyId::new(4, NoteName::G),
    KeyId::new(5, NoteName::C),
    KeyId::new(8, NoteName::F),
];

const KINDS: [PointerKind; 4] = [
    PointerKind::Down,
    PointerKind::Up,
    PointerKind::Enter,
    PointerKind::Leave,
];

#[derive(Debug, Clone)]
enum Op {
    Pointer { key: usize, kind: usize, buttons: u8 },
    Render,
    Gain(f32),
    Waveform(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..KEYS.len(), 0..KINDS.len(), 0u8..8)
            .prop_map(|(key, kind, buttons)| Op::Pointer { key, kind, buttons }),
        2 => Just(Op::Render),
        1 => (0.0f32..=1.0).prop_map(Op::Gain),
        1 => (0..WaveformKind::ALL.len()).prop_map(Op::Waveform),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn pressed_keys_and_voices_stay_in_step(ops in prop::collection::vec(op(), 1..200)) {
        let tone = ToneConfig::default();
        let (output, mut engine) = saavy_keys::channel(48_000.0, 8, tone.current_gain());
        let mut session = Session::new(PitchTable::default(), tone, output);
        let mut input = InputStateMachine::new();
        let mut out = vec![0.0f32; 128];

        for op in ops {
            match op {
                Op::Pointer { key, kind, buttons } => {
                    let event = PointerEvent::new(KINDS[kind], Buttons(buttons));
                    input.handle(KEYS[key], event, &mut session);
                }
                Op::Render => {
                    engine.render_block(&mut out);
                    session.output_mut().flush_parked();
                    engine.render_block(&mut out);
                    prop_assert_eq!(engine.allocated_voices(), session.voices().live_count());
                    prop_assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
                }
                Op::Gain(gain) => {
                    prop_assert_eq!(session.set_gain(gain), Ok(gain));
                }
                Op::Waveform(i) => session.select_waveform(WaveformKind::ALL[i]),
            }

            for key in KEYS {
                prop_assert_eq!(input.is_pressed(key), session.voices().is_live(key));
            }
            prop_assert!(!input.is_pressed(KEYS[3]));
        }

        input.release_all(&mut session);
        engine.render_block(&mut out);
        session.output_mut().flush_parked();
        engine.render_block(&mut out);

        prop_assert_eq!(session.voices().live_count(), 0);
        prop_assert_eq!(engine.allocated_voices(), 0);
        prop_assert_eq!(session.output().live_voices(), 0);
        prop_assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn table_tracks_equal_temperament(octave in 0u8..9, note in 0usize..12) {
        let table = PitchTable::build(0..=8).unwrap();
        let key = KeyId::new(octave, NoteName::ALL[note]);
        let hz = table.frequency(key).unwrap();
        let expected = 440.0 * 2f64.powf((key.midi() - 69) as f64 / 12.0);
        prop_assert!((hz - expected).abs() / expected < 1e-4);
    }
}
