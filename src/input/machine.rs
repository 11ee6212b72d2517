/*
Key Input State Machine
=======================

Each key runs its own two-state machine. There is no global "current key":
a drag across the keyboard is just one key releasing on its own Leave while
the next key presses on its own Enter.

              Down / Enter (primary held)
    Released ────────────────────────────▶ Pressed
        ▲                                     │
        └─────────────────────────────────────┘
                    Up / Leave

    Pressed  + Down/Enter   → no-op (same gesture delivering again)
    Released + Up/Leave     → no-op (stray leave after an up)
    any      + Enter, no primary button → ignored (hovering, not dragging)

The pressed flag lives here, not in the voice registry. A repeated press is
rejected before it ever reaches the registry, and the registry stays the
authority on what is actually sounding.

If starting the voice fails (a key outside the pitch table, no free voice)
the flag is rolled back so the key is Released again, and the caller gets
`Transition::Rejected` to show if it wants. Errors never escape `handle`.
*/

use std::collections::HashMap;

use super::PointerEvent;
use crate::output::{AudioOutput, VoiceHandle};
use crate::pitch::KeyId;
use crate::session::Session;
use crate::voice::VoiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPhase {
    #[default]
    Released,
    Pressed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub pressed: bool,
}

impl KeyState {
    pub fn phase(&self) -> KeyPhase {
        if self.pressed {
            KeyPhase::Pressed
        } else {
            KeyPhase::Released
        }
    }
}

/// What an event did to its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Released → Pressed; the voice is sounding.
    Pressed(VoiceHandle),
    /// Pressed → Released; the voice was stopped.
    Released,
    /// No state change.
    Ignored,
    /// A press that could not start a voice; the key stays Released.
    Rejected(VoiceError),
}

#[derive(Debug, Default)]
pub struct InputStateMachine {
    keys: HashMap<KeyId, KeyState>,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one pointer event to `key`.
    pub fn handle<O: AudioOutput>(
        &mut self,
        key: KeyId,
        event: PointerEvent,
        session: &mut Session<O>,
    ) -> Transition {
        let state = self.keys.entry(key).or_default();

        if event.is_press() {
            if state.pressed {
                return Transition::Ignored;
            }
            state.pressed = true;
            match session.start(key) {
                Ok(handle) => Transition::Pressed(handle),
                Err(err) => {
                    state.pressed = false;
                    tracing::warn!(%key, error = %err, "key produced no sound");
                    Transition::Rejected(err)
                }
            }
        } else if event.is_release() {
            if !state.pressed {
                return Transition::Ignored;
            }
            state.pressed = false;
            session.stop(key);
            Transition::Released
        } else {
            Transition::Ignored
        }
    }

    /// Release every pressed key, stopping its voice.
    pub fn release_all<O: AudioOutput>(&mut self, session: &mut Session<O>) -> usize {
        let mut released = 0;
        for (&key, state) in self.keys.iter_mut().filter(|(_, s)| s.pressed) {
            state.pressed = false;
            session.stop(key);
            released += 1;
        }
        released
    }

    pub fn phase(&self, key: KeyId) -> KeyPhase {
        self.keys.get(&key).map(KeyState::phase).unwrap_or_default()
    }

    pub fn is_pressed(&self, key: KeyId) -> bool {
        self.phase(key) == KeyPhase::Pressed
    }

    /// Pressed keys, lowest pitch first.
    pub fn pressed_keys(&self) -> Vec<KeyId> {
        let mut keys: Vec<_> = self
            .keys
            .iter()
            .filter(|(_, s)| s.pressed)
            .map(|(&k, _)| k)
            .collect();
        keys.sort_by_key(|k| k.midi());
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Buttons;
    use crate::output::OutputError;
    use crate::pitch::{NoteName, PitchError, PitchTable};
    use crate::tone::{ToneConfig, WaveformSpec};

    /// Counts creates and stops; fails every create once `limit` voices live.
    #[derive(Default)]
    struct Counter {
        live: Vec<VoiceHandle>,
        next: u32,
        creates: usize,
        stops: usize,
        limit: Option<usize>,
    }

    impl AudioOutput for Counter {
        fn create_voice(
            &mut self,
            _frequency: f64,
            _waveform: &WaveformSpec,
        ) -> Result<VoiceHandle, OutputError> {
            if let Some(capacity) = self.limit.filter(|&l| self.live.len() >= l) {
                return Err(OutputError::VoicesExhausted { capacity });
            }
            let handle = VoiceHandle(self.next);
            self.next += 1;
            self.creates += 1;
            self.live.push(handle);
            Ok(handle)
        }

        fn start_voice(&mut self, _handle: VoiceHandle) -> Result<(), OutputError> {
            Ok(())
        }

        fn stop_voice(&mut self, handle: VoiceHandle) {
            self.stops += 1;
            self.live.retain(|&h| h != handle);
        }

        fn set_master_gain(&mut self, _gain: f32) {}
    }

    const C4: KeyId = KeyId::new(4, NoteName::C);
    const D4: KeyId = KeyId::new(4, NoteName::D);
    const E4: KeyId = KeyId::new(4, NoteName::E);

    fn setup() -> (InputStateMachine, Session<Counter>) {
        (
            InputStateMachine::new(),
            Session::new(PitchTable::default(), ToneConfig::default(), Counter::default()),
        )
    }

    #[test]
    fn keys_start_released() {
        let (input, _) = setup();
        assert_eq!(input.phase(C4), KeyPhase::Released);
    }

    #[test]
    fn down_then_up() {
        let (mut input, mut session) = setup();
        assert!(matches!(
            input.handle(C4, PointerEvent::down(), &mut session),
            Transition::Pressed(_)
        ));
        assert!(input.is_pressed(C4));
        assert!(session.voices().is_live(C4));

        assert_eq!(input.handle(C4, PointerEvent::up(), &mut session), Transition::Released);
        assert!(!input.is_pressed(C4));
        assert!(!session.voices().is_live(C4));
    }

    #[test]
    fn repeated_press_is_cheap_noop() {
        let (mut input, mut session) = setup();
        input.handle(C4, PointerEvent::down(), &mut session);
        assert_eq!(
            input.handle(C4, PointerEvent::enter(Buttons::PRIMARY), &mut session),
            Transition::Ignored
        );
        assert_eq!(input.handle(C4, PointerEvent::down(), &mut session), Transition::Ignored);
        assert_eq!(session.output().creates, 1);
    }

    #[test]
    fn leave_after_up_is_noop() {
        let (mut input, mut session) = setup();
        input.handle(C4, PointerEvent::down(), &mut session);
        input.handle(C4, PointerEvent::up(), &mut session);
        assert_eq!(
            input.handle(C4, PointerEvent::leave(Buttons::NONE), &mut session),
            Transition::Ignored
        );
        assert_eq!(session.output().stops, 1);
    }

    #[test]
    fn hover_without_button_is_ignored() {
        let (mut input, mut session) = setup();
        assert_eq!(
            input.handle(E4, PointerEvent::enter(Buttons::NONE), &mut session),
            Transition::Ignored
        );
        assert!(!input.is_pressed(E4));
        assert_eq!(session.voices().live_count(), 0);
        assert_eq!(session.output().creates, 0);
    }

    #[test]
    fn secondary_button_down_is_ignored() {
        let (mut input, mut session) = setup();
        let right_click = PointerEvent::new(crate::input::PointerKind::Down, Buttons::SECONDARY);
        assert_eq!(input.handle(C4, right_click, &mut session), Transition::Ignored);
        assert_eq!(session.voices().live_count(), 0);
    }

    #[test]
    fn drag_legato_hands_over_between_keys() {
        let (mut input, mut session) = setup();

        input.handle(C4, PointerEvent::down(), &mut session);
        input.handle(D4, PointerEvent::enter(Buttons::PRIMARY), &mut session);
        // Both sound for the instant between D4's enter and C4's leave.
        assert_eq!(session.voices().live_count(), 2);

        input.handle(C4, PointerEvent::leave(Buttons::PRIMARY), &mut session);
        assert!(!session.voices().is_live(C4));
        assert!(session.voices().is_live(D4));

        input.handle(D4, PointerEvent::up(), &mut session);
        assert_eq!(session.voices().live_count(), 0);
        assert_eq!(session.output().creates, 2);
        assert_eq!(session.output().stops, 2);
    }

    #[test]
    fn unpopulated_key_is_rejected_and_rolled_back() {
        let (mut input, mut session) = setup();
        input.handle(C4, PointerEvent::down(), &mut session);

        let f8 = KeyId::new(8, NoteName::F);
        let result = input.handle(f8, PointerEvent::down(), &mut session);
        assert!(matches!(
            result,
            Transition::Rejected(VoiceError::Pitch(PitchError::KeyNotFound { octave: 8, .. }))
        ));
        assert!(!input.is_pressed(f8));
        assert!(input.is_pressed(C4));
        assert!(session.voices().is_live(C4));
        assert_eq!(session.voices().live_count(), 1);

        // A later release of the rejected key is a no-op.
        assert_eq!(input.handle(f8, PointerEvent::up(), &mut session), Transition::Ignored);
    }

    #[test]
    fn exhausted_output_rejects_without_leaking() {
        let (mut input, _) = setup();
        let counter = Counter {
            limit: Some(1),
            ..Counter::default()
        };
        let mut session = Session::new(PitchTable::default(), ToneConfig::default(), counter);

        input.handle(C4, PointerEvent::down(), &mut session);
        let result = input.handle(D4, PointerEvent::enter(Buttons::PRIMARY), &mut session);
        assert!(matches!(result, Transition::Rejected(VoiceError::Output(_))));
        assert!(!input.is_pressed(D4));

        // Once C4 lets go, D4 can sound on the next press.
        input.handle(C4, PointerEvent::leave(Buttons::PRIMARY), &mut session);
        assert!(matches!(
            input.handle(D4, PointerEvent::down(), &mut session),
            Transition::Pressed(_)
        ));
    }

    #[test]
    fn release_all_stops_every_pressed_key() {
        let (mut input, mut session) = setup();
        for key in [C4, D4, E4] {
            input.handle(key, PointerEvent::down(), &mut session);
        }
        assert_eq!(input.pressed_keys(), vec![C4, D4, E4]);

        assert_eq!(input.release_all(&mut session), 3);
        assert!(input.pressed_keys().is_empty());
        assert_eq!(session.voices().live_count(), 0);
        assert!(session.output().live.is_empty());
    }
}
